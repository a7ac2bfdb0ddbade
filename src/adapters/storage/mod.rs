//! Attachment storage collaborator boundary
//!
//! The core never reads attachment bytes; it only asks the storage
//! collaborator for the durable location of a stored file while rewriting
//! payload references.

use std::collections::HashMap;

use url::Url;

use crate::domain::errors::{HermesError, TranslationError};
use crate::domain::result::Result;

/// Resolves stored attachment filenames to durable locations
pub trait AttachmentStorage: Send + Sync {
    /// Returns the durable location for a stored file.
    ///
    /// # Errors
    ///
    /// Fails when the filename cannot be resolved; the enclosing payload
    /// rewrite fails with it.
    fn get_file_location(&self, filename: &str) -> Result<String>;
}

/// In-memory storage map, used by the CLI and by tests
#[derive(Debug, Default)]
pub struct StaticAttachmentStorage {
    locations: HashMap<String, String>,
}

impl StaticAttachmentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the durable location for a filename
    pub fn insert(&mut self, filename: impl Into<String>, location: impl Into<String>) {
        self.locations.insert(filename.into(), location.into());
    }
}

impl AttachmentStorage for StaticAttachmentStorage {
    fn get_file_location(&self, filename: &str) -> Result<String> {
        let location = self
            .locations
            .get(filename)
            .ok_or_else(|| TranslationError::StorageLocation(filename.to_string()))?;

        Url::parse(location).map_err(|e| {
            HermesError::Translation(TranslationError::StorageLocation(format!(
                "{filename}: stored location is not a valid URL: {e}"
            )))
        })?;

        Ok(location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_registered_location() {
        let mut storage = StaticAttachmentStorage::new();
        storage.insert("scan.pdf", "https://storage.example.com/scan.pdf");
        assert_eq!(
            storage.get_file_location("scan.pdf").unwrap(),
            "https://storage.example.com/scan.pdf"
        );
    }

    #[test]
    fn test_unknown_filename_fails() {
        let storage = StaticAttachmentStorage::new();
        assert!(storage.get_file_location("missing.pdf").is_err());
    }

    #[test]
    fn test_invalid_url_fails() {
        let mut storage = StaticAttachmentStorage::new();
        storage.insert("scan.pdf", "not a url");
        assert!(storage.get_file_location("scan.pdf").is_err());
    }
}
