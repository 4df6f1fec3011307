//! Core fetch functionality for imgfetch
//!
//! One GET per URL: check the headers, stream the body to disk in fixed-size
//! chunks, verify the real size and look the content hash up in the run's
//! registry. Fetches never overlap; the registry is only touched through
//! `&mut self`.

use std::path::Path;

use bytes::BytesMut;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::core::digest::{content_hash, HashRegistry};
use crate::core::error::{Error, Result};
use crate::core::report::{FetchOutcome, FetchReport, FetchSummary, SkipReason};
use crate::core::source::{resolve_output_filename, resolve_source, FetchConfig};
use crate::core::stream::{create_http_stream, DuplicatePolicy, FetchOptions};

/// Preallocation cap for the in-memory copy of a body
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Builds the HTTP client used for every fetch of a [`Fetcher`].
///
/// Timeouts apply per socket operation; a slow body that keeps delivering
/// bytes is never cut off.
fn build_client(config: &FetchConfig) -> Result<Client> {
    ClientBuilder::new()
        .read_timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(Into::into)
}

/// True for `image/*` media types, parameters and case ignored
fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Content-Length as a number; zero and malformed values count as absent
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&len| len > 0)
}

/// Removes a file that should not survive a failed fetch
async fn discard_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {e}", path.display()),
    }
}

/// Sequential image fetcher with per-run duplicate detection
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    options: FetchOptions,
    hashes: HashRegistry,
}

impl Fetcher {
    /// Create a fetcher with default configuration and options
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default(), FetchOptions::default())
    }

    /// Create a fetcher with custom configuration and options
    pub fn with_config(config: FetchConfig, options: FetchOptions) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config,
            options,
            hashes: HashRegistry::new(),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Hashes recorded so far in this run
    pub fn hashes(&self) -> &HashRegistry {
        &self.hashes
    }

    /// Fetch one URL and print its status line. Never fails; errors end up
    /// in the returned report.
    pub async fn fetch_image(&mut self, url: &str) -> FetchReport {
        let result = self.try_fetch(url).await;
        if let Err(e) = &result {
            warn!("{url}: {e}");
        }

        let report = FetchReport::new(url, &result);
        eprintln!("{report}");
        report
    }

    /// Fetch every URL in order, sharing the duplicate registry
    pub async fn fetch_all<I, S>(&mut self, urls: I) -> FetchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = FetchSummary::default();
        for url in urls {
            let report = self.fetch_image(url.as_ref()).await;
            summary.push(report);
        }
        summary
    }

    /// Fetch one URL, returning failures as errors instead of printing them
    pub async fn try_fetch(&mut self, url: &str) -> Result<FetchOutcome> {
        let parsed = resolve_source(url)?;
        debug!("GET {parsed}");

        let response = self.client.get(parsed.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let declared = declared_length(response.headers());
        debug!("{url}: {status}, Content-Type {content_type:?}, Content-Length {declared:?}");

        if !is_image_content_type(&content_type) {
            return Ok(FetchOutcome::Skipped(SkipReason::NotAnImage { content_type }));
        }

        if let Some(declared) = declared {
            if declared > self.options.max_size {
                return Ok(FetchOutcome::Skipped(SkipReason::TooLarge {
                    declared,
                    max_size: self.options.max_size,
                }));
            }
        }

        let filename = resolve_output_filename(&parsed);
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let file_path = self.config.output_dir.join(&filename);

        let stream = create_http_stream(response);
        let saved = self.save_stream(stream, &file_path, &filename, declared).await;
        let content = match saved {
            Ok(content) => content,
            Err(e) => {
                self.hashes.forget_path(&file_path);
                return Err(e);
            }
        };

        let bytes = content.len() as u64;
        let hash = content_hash(&content);

        match self.hashes.record(&hash, &file_path) {
            None => {
                info!("Saved {} ({bytes} bytes, md5 {hash})", file_path.display());
                Ok(FetchOutcome::Saved {
                    path: file_path,
                    hash,
                    bytes,
                })
            }
            Some(original) => {
                let same_file = original == file_path;
                if !same_file {
                    self.hashes.forget_path(&file_path);
                }

                let removed = !same_file && self.options.duplicates == DuplicatePolicy::Skip;
                if removed {
                    tokio::fs::remove_file(&file_path).await?;
                }
                info!(
                    "{} duplicates {} (md5 {hash})",
                    file_path.display(),
                    original.display()
                );

                Ok(FetchOutcome::Duplicate {
                    path: file_path,
                    original,
                    hash,
                    bytes,
                    removed,
                })
            }
        }
    }

    /// Stream a body to `file_path`, then check its real size.
    ///
    /// Reading stops as soon as more than `max_size` bytes have arrived. The
    /// file is removed again if streaming fails or the body turns out larger
    /// than `max_size`.
    async fn save_stream<R>(
        &self,
        stream: R,
        file_path: &Path,
        name: &str,
        total: Option<u64>,
    ) -> Result<BytesMut>
    where
        R: AsyncRead + Unpin,
    {
        let content = match self.stream_to_file(stream, file_path, name, total).await {
            Ok(content) => content,
            Err(e) => {
                discard_file(file_path).await;
                return Err(e);
            }
        };

        let actual = content.len() as u64;
        if actual > self.options.max_size {
            discard_file(file_path).await;
            return Err(Error::SizeLimitExceeded {
                actual,
                max_size: self.options.max_size,
            });
        }

        Ok(content)
    }

    async fn stream_to_file<R>(
        &self,
        mut stream: R,
        file_path: &Path,
        name: &str,
        total: Option<u64>,
    ) -> Result<BytesMut>
    where
        R: AsyncRead + Unpin,
    {
        let mut file = tokio::fs::File::create(file_path).await?;
        let progress = &self.options.progress;
        progress.start(name, total);

        let mut buffer = vec![0u8; self.options.chunk_size.max(1)];
        let mut content = BytesMut::with_capacity(total.unwrap_or(0).min(MAX_PREALLOC) as usize);
        let max_size = self.options.max_size;

        let result = async {
            loop {
                let bytes_read = stream
                    .read(&mut buffer)
                    .await
                    .map_err(Error::body_read)?;

                if bytes_read == 0 {
                    break;
                }

                file.write_all(&buffer[..bytes_read]).await?;
                content.extend_from_slice(&buffer[..bytes_read]);
                progress.advance(content.len() as u64);

                // Already over the limit; save_stream reports it
                if content.len() as u64 > max_size {
                    break;
                }
            }

            file.flush().await?;
            Ok::<(), Error>(())
        }
        .await;

        progress.finish();
        result.map(|()| content)
    }
}
