//! Immutable recording blobs and the object URLs that reference them

use std::collections::HashMap;
use std::sync::Arc;

/// Finished recording bytes with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
    mime_type: String,
}

impl Blob {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Hands out `blob:` URLs for blobs until they are revoked
///
/// A URL keeps its blob alive; revoking releases the registry's reference.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    urls: HashMap<String, Arc<Blob>>,
    next_id: u64,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, blob: Arc<Blob>) -> String {
        self.next_id += 1;
        let url = format!("blob:muse/{}", self.next_id);
        self.urls.insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        self.urls.get(url).cloned()
    }

    /// Returns false if the URL was unknown or already revoked
    pub fn revoke(&mut self, url: &str) -> bool {
        self.urls.remove(url).is_some()
    }

    /// Number of live URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
