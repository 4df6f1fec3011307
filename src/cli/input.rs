//! URL list handling for the command-line interface

use std::path::Path;

use anyhow::{Context, Result};

/// Parses a URL list: one URL per line, blank lines and `#` comments ignored
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Positional URLs first, then the ones listed in `input`, if given
pub fn collect_urls(args: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    let mut urls: Vec<String> = args
        .iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    if let Some(path) = input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        urls.extend(parse_url_list(&text));
    }

    Ok(urls)
}
