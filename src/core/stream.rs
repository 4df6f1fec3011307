//! Streaming types for imgfetch
//!
//! Wraps HTTP response bodies as AsyncRead and defines the per-fetch options
//! and the progress hook.

use std::io::ErrorKind;
use std::str::FromStr;
use std::sync::Arc;

use futures::TryStreamExt;
use tokio::io::AsyncRead;

/// Default upper bound on image size (10 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Default read size when streaming a body to disk
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Receives progress for one fetch at a time.
///
/// `start` is called once the destination file is open, `advance` after every
/// chunk with the running byte count, and `finish` when the body has been
/// fully read or the transfer was abandoned.
pub trait ProgressSink: Send + Sync {
    fn start(&self, name: &str, total: Option<u64>);
    fn advance(&self, downloaded: u64);
    fn finish(&self);
}

/// Sink that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&self, _name: &str, _total: Option<u64>) {}
    fn advance(&self, _downloaded: u64) {}
    fn finish(&self) {}
}

/// What to do with a file whose content hash was already seen this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Delete the new copy and point at the first one (default)
    #[default]
    Skip,
    /// Leave the new copy on disk, only report it
    Keep,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "keep" => Ok(Self::Keep),
            other => Err(format!("unknown duplicate policy '{other}' (expected skip or keep)")),
        }
    }
}

/// Options for fetch operations
#[derive(Clone)]
pub struct FetchOptions {
    /// Largest accepted body, checked against Content-Length and the real size
    pub max_size: u64,

    /// Read size for streaming the body to disk
    pub chunk_size: usize,

    /// Handling of repeated content within a run
    pub duplicates: DuplicatePolicy,

    /// Progress hook
    pub progress: Arc<dyn ProgressSink>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            duplicates: DuplicatePolicy::default(),
            progress: Arc::new(NoProgress),
        }
    }
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("max_size", &self.max_size)
            .field("chunk_size", &self.chunk_size)
            .field("duplicates", &self.duplicates)
            .finish_non_exhaustive()
    }
}

/// Exposes an HTTP response body as AsyncRead.
///
/// Body timeouts come out as `ErrorKind::TimedOut`; the reqwest error stays
/// attached as the source.
pub fn create_http_stream(response: reqwest::Response) -> impl AsyncRead + Send + Unpin {
    tokio_util::io::StreamReader::new(response.bytes_stream().map_err(|e| {
        let kind = if e.is_timeout() {
            ErrorKind::TimedOut
        } else {
            ErrorKind::Other
        };
        std::io::Error::new(kind, e)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = FetchOptions::default();
        assert_eq!(options.max_size, 10 * 1024 * 1024);
        assert_eq!(options.chunk_size, 1024);
        assert_eq!(options.duplicates, DuplicatePolicy::Skip);
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("skip".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Skip));
        assert_eq!("KEEP".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Keep));
        assert!("rename".parse::<DuplicatePolicy>().is_err());
    }
}
