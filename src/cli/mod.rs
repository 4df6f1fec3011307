//! CLI-specific utilities for imgfetch
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod input;
pub mod progress;

pub use input::collect_urls;
pub use progress::ProgressManager;
