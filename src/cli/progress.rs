//! CLI-specific progress handling for imgfetch
//!
//! Provides the progress bar implementation for the command-line interface.

use std::sync::Mutex;

use imgfetch::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const BAR_TEMPLATE: &str =
    "{msg:20!} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {bytes_per_sec}";

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg:20!} [{elapsed_precise}] {bytes} {bytes_per_sec}";

static BAR_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

static SPINNER_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Creates a progress bar for one file; a spinner when the size is unknown
pub fn create_progress_bar(name: &str, total_size: Option<u64>) -> ProgressBar {
    let pb = match total_size {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(BAR_STYLE.clone());
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(SPINNER_STYLE.clone());
            pb
        }
    };
    pb.set_message(name.to_string());
    pb
}

/// Terminal progress for a sequence of fetches, one bar per file
#[derive(Default)]
pub struct ProgressManager {
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ProgressManager {
    fn start(&self, name: &str, total: Option<u64>) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.take() {
                previous.finish_and_clear();
            }
            *current = Some(create_progress_bar(name, total));
        }
    }

    fn advance(&self, downloaded: u64) {
        if let Ok(current) = self.current.lock() {
            if let Some(pb) = current.as_ref() {
                pb.set_position(downloaded);
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(pb) = current.take() {
                pb.finish();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar_with_total() {
        let pb = create_progress_bar("cat.png", Some(1000));
        assert_eq!(pb.length(), Some(1000));
        assert_eq!(pb.message(), "cat.png");

        pb.set_position(100);
        pb.finish();
    }

    #[test]
    fn test_create_progress_bar_without_total() {
        let pb = create_progress_bar("image_abc.jpg", None);
        assert_eq!(pb.length(), None);
        pb.finish();
    }

    #[test]
    fn test_progress_manager_lifecycle() {
        let manager = ProgressManager::new();
        manager.start("cat.png", Some(500));
        manager.advance(250);
        {
            let current = manager.current.lock().unwrap();
            assert_eq!(current.as_ref().map(|pb| pb.position()), Some(250));
        }

        manager.finish();
        assert!(manager.current.lock().unwrap().is_none());
    }
}
