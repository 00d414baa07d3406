//! CharacterRecord entity - a named combatant with an avatar and voice clips

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CharacterId, MediaAssetId};

/// A character row.
///
/// `audio_asset_ids` keeps the declared clip order; it is decoded once from
/// the delimited column when the row is read and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    id: Option<CharacterId>,
    enabled: bool,
    created_at: DateTime<Utc>,
    avatar_asset_id: MediaAssetId,
    name: String,
    audio_asset_ids: Vec<MediaAssetId>,
}

impl CharacterRecord {
    pub fn new(
        name: impl Into<String>,
        avatar_asset_id: MediaAssetId,
        audio_asset_ids: Vec<MediaAssetId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            enabled: true,
            created_at: now,
            avatar_asset_id,
            name: name.into(),
            audio_asset_ids,
        }
    }

    /// Reconstruct from stored data (e.g., database)
    pub fn reconstruct(
        id: CharacterId,
        enabled: bool,
        created_at: DateTime<Utc>,
        avatar_asset_id: MediaAssetId,
        name: String,
        audio_asset_ids: Vec<MediaAssetId>,
    ) -> Self {
        Self {
            id: Some(id),
            enabled,
            created_at,
            avatar_asset_id,
            name,
            audio_asset_ids,
        }
    }

    pub fn id(&self) -> Option<CharacterId> {
        self.id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn avatar_asset_id(&self) -> MediaAssetId {
        self.avatar_asset_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn audio_asset_ids(&self) -> &[MediaAssetId] {
        &self.audio_asset_ids
    }

    pub fn assign_id(&mut self, id: CharacterId) {
        self.id = Some(id);
    }

    /// Carry identity and bookkeeping over from an earlier version of the row.
    pub fn with_identity(mut self, id: CharacterId, enabled: bool, created_at: DateTime<Utc>) -> Self {
        self.id = Some(id);
        self.enabled = enabled;
        self.created_at = created_at;
        self
    }
}
