//! # imgfetch Library
//!
//! Fetches images over HTTP, one URL at a time, and saves them to a local
//! directory.
//!
//! ## Features
//!
//! - **Header checks**: non-image `Content-Type` and oversized `Content-Length`
//!   are skipped before the body is read
//! - **Streaming**: bodies are written to disk in 1 KiB chunks with optional
//!   progress reporting
//! - **Size guard**: the real body size is checked again after download
//! - **Duplicate detection**: MD5 content hashes are tracked for the lifetime
//!   of a [`Fetcher`]
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Single image into ./Fetched_Images with the default 10 MiB limit
//!     let report = imgfetch::fetch_image("https://example.com/cat.png", None).await?;
//!     println!("{report}");
//!
//!     // Several images, duplicates detected across the list
//!     let summary = imgfetch::fetch_all(
//!         ["https://example.com/a.png", "https://example.com/b.png"],
//!         imgfetch::FetchOptions::default(),
//!     )
//!     .await?;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::digest::{content_hash, HashRegistry};
pub use crate::core::error::{Error, Result};
pub use crate::core::report::{FetchOutcome, FetchReport, FetchStatus, FetchSummary, SkipReason};
pub use crate::core::source::{resolve_source, DEFAULT_OUTPUT_DIR};
pub use crate::core::stream::{
    DuplicatePolicy, FetchOptions, NoProgress, ProgressSink, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SIZE,
};

// Internal modules
mod core;

/// Fetch a single image into the default output directory
///
/// # Arguments
/// * `url` - HTTP(S) URL of the image
/// * `max_size` - Size limit in bytes; `None` means 10 MiB
///
/// Fetch failures are reported in the returned [`FetchReport`]; this only
/// fails if the HTTP client cannot be created.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = imgfetch::fetch_image("https://example.com/logo.png", Some(512 * 1024)).await?;
/// if report.status == imgfetch::FetchStatus::Saved {
///     println!("saved to {:?}", report.path);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_image(url: &str, max_size: Option<u64>) -> Result<FetchReport> {
    let options = FetchOptions {
        max_size: max_size.unwrap_or(DEFAULT_MAX_SIZE),
        ..Default::default()
    };
    let mut fetcher = Fetcher::with_config(FetchConfig::default(), options)?;

    Ok(fetcher.fetch_image(url).await)
}

/// Fetch a list of images in order into the default output directory
///
/// # Examples
/// ```rust,no_run
/// use imgfetch::{DuplicatePolicy, FetchOptions};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = FetchOptions {
///     max_size: 2 * 1024 * 1024,
///     duplicates: DuplicatePolicy::Keep,
///     ..Default::default()
/// };
/// let summary = imgfetch::fetch_all(["https://example.com/a.jpg"], options).await?;
/// println!("{} saved, {} failed", summary.saved, summary.failed);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_all<I, S>(urls: I, options: FetchOptions) -> Result<FetchSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fetcher = Fetcher::with_config(FetchConfig::default(), options)?;
    Ok(fetcher.fetch_all(urls).await)
}

/// Advanced API: a long-lived fetcher with custom configuration
///
/// # Examples
/// ```rust,no_run
/// use imgfetch::{FetchConfig, FetchOptions, Fetcher};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FetchConfig {
///     output_dir: "downloads".into(),
///     ..Default::default()
/// };
///
/// let mut fetcher = Fetcher::with_config(config, FetchOptions::default())?;
/// let outcome = fetcher.try_fetch("https://example.com/cat.png").await?;
/// println!("{:?}", outcome.hash());
/// # Ok(())
/// # }
/// ```
pub use crate::core::{resolve_output_filename, FetchConfig, Fetcher};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_filename() {
        let url = resolve_source("https://example.com/pics/dog.jpeg").unwrap();
        assert_eq!(resolve_output_filename(&url), "dog.jpeg");

        let url = resolve_source("https://example.com/").unwrap();
        let name = resolve_output_filename(&url);
        assert!(name.starts_with("image_") && name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_fetch_image_reports_invalid_url() {
        let report = fetch_image("not-a-url", None).await.unwrap();
        assert_eq!(report.status, FetchStatus::Failed);
        assert!(report.path.is_none());
    }
}
