//! Source resolution logic for imgfetch
//!
//! Turns URL strings into parsed HTTP(S) URLs and decides the file name an
//! image is saved under.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use uuid::Uuid;

use crate::core::error::{Error, Result};

/// Directory images land in unless told otherwise
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";

/// Configuration shared by every fetch of a [`crate::Fetcher`]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Destination directory, created on first use
    pub output_dir: PathBuf,

    /// Socket read timeout: the longest gap allowed between body reads
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("imgfetch/{}", env!("IMGFETCH_VERSION")),
        }
    }
}

/// Parses a URL string and rejects anything that is not HTTP(S)
pub fn resolve_source(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidUrl(format!(
            "{url}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Generates the output filename from the last path segment of a URL.
///
/// URLs without a final segment ("https://host/", "https://host/dir/") get a
/// random `image_<hex>.jpg` name. The suffix is always `.jpg`, whatever the
/// server says the content type is.
pub fn resolve_output_filename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(generate_filename)
}

fn generate_filename() -> String {
    format!("image_{}.jpg", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_generated(name: &str) -> bool {
        name.strip_prefix("image_")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .is_some_and(|hex| hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()))
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("Fetched_Images"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("imgfetch/"));
    }

    #[test]
    fn test_resolve_source_accepts_http() {
        let url = resolve_source("https://example.com/cat.png").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));

        let url = resolve_source("  http://example.com/a/b.gif\n").unwrap();
        assert_eq!(url.path(), "/a/b.gif");
    }

    #[test]
    fn test_resolve_source_rejects_other_schemes() {
        let err = resolve_source("ftp://example.com/cat.png").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_resolve_source_rejects_garbage() {
        assert!(matches!(
            resolve_source("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resolve_output_filename_from_path() {
        let url = resolve_source("https://example.com/images/cat.png?size=large").unwrap();
        assert_eq!(resolve_output_filename(&url), "cat.png");

        let url = resolve_source("https://example.com/photo").unwrap();
        assert_eq!(resolve_output_filename(&url), "photo");
    }

    #[test]
    fn test_resolve_output_filename_generated() {
        for raw in ["https://example.com", "https://example.com/", "https://example.com/gallery/"] {
            let url = resolve_source(raw).unwrap();
            let name = resolve_output_filename(&url);
            assert!(is_generated(&name), "unexpected name {name} for {raw}");
        }
    }

    #[test]
    fn test_generated_filenames_are_unique() {
        let url = resolve_source("https://example.com/").unwrap();
        assert_ne!(resolve_output_filename(&url), resolve_output_filename(&url));
    }
}
