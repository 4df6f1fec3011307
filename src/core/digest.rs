//! Content hashing and per-run duplicate bookkeeping

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// MD5 of `content` as lowercase hex. Used for duplicate detection only.
pub fn content_hash(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

/// Hashes seen during this run, each mapped to the file it was first saved as.
///
/// Lives as long as the owning fetcher; nothing is persisted.
#[derive(Debug, Default)]
pub struct HashRegistry {
    seen: HashMap<String, PathBuf>,
}

impl HashRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `hash` as saved at `path`.
    ///
    /// Returns the earlier path if the hash was already known, in which case
    /// the registry is left unchanged.
    pub fn record(&mut self, hash: &str, path: &Path) -> Option<PathBuf> {
        if let Some(original) = self.seen.get(hash) {
            return Some(original.clone());
        }

        // The file at `path` now holds new content
        self.forget_path(path);
        self.seen.insert(hash.to_string(), path.to_path_buf());
        None
    }

    /// Drops every hash whose file was `path`
    pub fn forget_path(&mut self, path: &Path) {
        self.seen.retain(|_, saved| saved != path);
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.seen.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_known_values() {
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_hash(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_record_detects_duplicate() {
        let mut registry = HashRegistry::new();
        let hash = content_hash(b"pixels");

        assert_eq!(registry.record(&hash, Path::new("out/a.png")), None);
        assert_eq!(
            registry.record(&hash, Path::new("out/b.png")),
            Some(PathBuf::from("out/a.png"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_overwritten_path_is_forgotten() {
        let mut registry = HashRegistry::new();
        let first = content_hash(b"first");
        let second = content_hash(b"second");

        registry.record(&first, Path::new("out/same.png"));
        registry.record(&second, Path::new("out/same.png"));

        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));
        assert_eq!(registry.record(&first, Path::new("out/other.png")), None);
    }

    #[test]
    fn test_forget_path() {
        let mut registry = HashRegistry::new();
        registry.record(&content_hash(b"x"), Path::new("out/x.png"));
        registry.forget_path(Path::new("out/x.png"));
        assert!(registry.is_empty());
    }
}
