//! Outcomes and human-readable reports of single fetches

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::error::{format_megabytes, Error, Result};

/// Why a fetch stopped before anything was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Content-Type missing or not `image/*`
    NotAnImage { content_type: String },
    /// Content-Length above the configured maximum
    TooLarge { declared: u64, max_size: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnImage { content_type } => {
                write!(f, "Not an image, Content-Type: {content_type}")
            }
            SkipReason::TooLarge { declared, .. } => {
                write!(f, "File too large: {}", format_megabytes(*declared))
            }
        }
    }
}

/// Result of a fetch that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New content written to `path`
    Saved { path: PathBuf, hash: String, bytes: u64 },
    /// Content identical to an earlier fetch of this run
    Duplicate {
        path: PathBuf,
        original: PathBuf,
        hash: String,
        bytes: u64,
        /// Whether the new copy was deleted again
        removed: bool,
    },
    /// Nothing written
    Skipped(SkipReason),
}

impl FetchOutcome {
    pub fn hash(&self) -> Option<&str> {
        match self {
            FetchOutcome::Saved { hash, .. } | FetchOutcome::Duplicate { hash, .. } => Some(hash.as_str()),
            FetchOutcome::Skipped(_) => None,
        }
    }
}

/// Coarse classification used in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Saved,
    Duplicate,
    Skipped,
    Failed,
}

/// What happened to one URL, ready for printing or serialization
#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub url: String,
    pub status: FetchStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

impl FetchReport {
    pub fn new(url: &str, result: &Result<FetchOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(url, outcome),
            Err(err) => Self::from_error(url, err),
        }
    }

    fn from_outcome(url: &str, outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Saved { path, hash, bytes } => Self {
                url: url.to_string(),
                status: FetchStatus::Saved,
                message: format!(
                    "✓ Saved {url} -> {} ({})",
                    path.display(),
                    format_megabytes(*bytes)
                ),
                path: Some(path.clone()),
                hash: Some(hash.clone()),
                bytes: Some(*bytes),
            },
            FetchOutcome::Duplicate {
                path,
                original,
                hash,
                bytes,
                removed,
            } => {
                let message = if *removed {
                    format!("✗ Skipped {url} (Duplicate of {})", original.display())
                } else {
                    format!(
                        "✓ Saved {url} -> {} (duplicate of {})",
                        path.display(),
                        original.display()
                    )
                };
                Self {
                    url: url.to_string(),
                    status: FetchStatus::Duplicate,
                    message,
                    path: Some(if *removed { original.clone() } else { path.clone() }),
                    hash: Some(hash.clone()),
                    bytes: Some(*bytes),
                }
            }
            FetchOutcome::Skipped(reason) => Self {
                url: url.to_string(),
                status: FetchStatus::Skipped,
                message: format!("✗ Skipped {url} ({reason})"),
                path: None,
                hash: None,
                bytes: None,
            },
        }
    }

    fn from_error(url: &str, err: &Error) -> Self {
        Self {
            url: url.to_string(),
            status: FetchStatus::Failed,
            message: format!("✗ Failed {url} ({err})"),
            path: None,
            hash: None,
            bytes: None,
        }
    }
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reports of a whole run, in fetch order
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchSummary {
    pub saved: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
    pub reports: Vec<FetchReport>,
}

impl FetchSummary {
    pub fn push(&mut self, report: FetchReport) {
        match report.status {
            FetchStatus::Saved => self.saved += 1,
            FetchStatus::Duplicate => self.duplicates += 1,
            FetchStatus::Skipped => self.skipped += 1,
            FetchStatus::Failed => self.failed += 1,
        }
        self.reports.push(report);
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fetched: {} saved, {} duplicate, {} skipped, {} failed",
            self.total(),
            self.saved,
            self.duplicates,
            self.skipped,
            self.failed
        )
    }
}
