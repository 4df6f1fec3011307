//! Core library modules for imgfetch
//!
//! This module contains the internal implementation details of the imgfetch library.

pub mod digest;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod source;
pub mod stream;

// Re-export main types for internal use
pub use fetcher::Fetcher;
pub use source::{resolve_output_filename, FetchConfig};
