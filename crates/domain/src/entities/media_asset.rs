//! MediaAssetRecord entity - a stored pointer to an image or audio file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MediaAssetId, MediaAssetType, MediaPath};

/// A media asset row.
///
/// `path` is the true identity of the decoded resource (it keys the media
/// cache); `(kind, name)` is only a lookup convenience and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAssetRecord {
    id: Option<MediaAssetId>,
    /// Reserved for soft deletion
    enabled: bool,
    created_at: DateTime<Utc>,
    name: String,
    kind: MediaAssetType,
    path: MediaPath,
}

impl MediaAssetRecord {
    /// Create a record that has not been stored yet.
    pub fn new(
        name: impl Into<String>,
        kind: MediaAssetType,
        path: MediaPath,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            enabled: true,
            created_at: now,
            name: name.into(),
            kind,
            path,
        }
    }

    /// Reconstruct from stored data (e.g., database)
    pub fn reconstruct(
        id: MediaAssetId,
        enabled: bool,
        created_at: DateTime<Utc>,
        name: String,
        kind: MediaAssetType,
        path: MediaPath,
    ) -> Self {
        Self {
            id: Some(id),
            enabled,
            created_at,
            name,
            kind,
            path,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Option<MediaAssetId> {
        self.id
    }

    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MediaAssetType {
        self.kind
    }

    pub fn path(&self) -> &MediaPath {
        &self.path
    }

    // --- Mutation methods ---

    /// Record the identity handed out by the store.
    pub fn assign_id(&mut self, id: MediaAssetId) {
        self.id = Some(id);
    }

    /// Point the record at the durable copy of its file.
    pub fn relocate(&mut self, path: MediaPath, name: impl Into<String>) {
        self.path = path;
        self.name = name.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
