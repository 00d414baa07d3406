//! ConfigurationRecord entity - the persisted encounter setup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{CharacterId, ConfigurationId, MediaAssetId};

/// An encounter configuration row: roster, turn order and backdrop.
///
/// When `initiative_order` is present it runs parallel to `character_ids`
/// (same length, same positions). Construction enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    id: Option<ConfigurationId>,
    enabled: bool,
    created_at: DateTime<Utc>,
    character_ids: Vec<CharacterId>,
    initiative_order: Option<Vec<i32>>,
    background_asset_id: MediaAssetId,
}

impl ConfigurationRecord {
    /// Create an unstored configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the initiative list is present and
    /// its length differs from the roster's.
    pub fn new(
        character_ids: Vec<CharacterId>,
        initiative_order: Option<Vec<i32>>,
        background_asset_id: MediaAssetId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        check_parallel(&character_ids, initiative_order.as_deref())?;
        Ok(Self {
            id: None,
            enabled: true,
            created_at: now,
            character_ids,
            initiative_order,
            background_asset_id,
        })
    }

    /// Reconstruct from stored data (e.g., database)
    pub fn reconstruct(
        id: ConfigurationId,
        enabled: bool,
        created_at: DateTime<Utc>,
        character_ids: Vec<CharacterId>,
        initiative_order: Option<Vec<i32>>,
        background_asset_id: MediaAssetId,
    ) -> Result<Self, DomainError> {
        check_parallel(&character_ids, initiative_order.as_deref())?;
        Ok(Self {
            id: Some(id),
            enabled,
            created_at,
            character_ids,
            initiative_order,
            background_asset_id,
        })
    }

    pub fn id(&self) -> Option<ConfigurationId> {
        self.id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn character_ids(&self) -> &[CharacterId] {
        &self.character_ids
    }

    pub fn initiative_order(&self) -> Option<&[i32]> {
        self.initiative_order.as_deref()
    }

    pub fn background_asset_id(&self) -> MediaAssetId {
        self.background_asset_id
    }

    pub fn assign_id(&mut self, id: ConfigurationId) {
        self.id = Some(id);
    }

    pub fn with_identity(
        mut self,
        id: ConfigurationId,
        enabled: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.id = Some(id);
        self.enabled = enabled;
        self.created_at = created_at;
        self
    }
}

fn check_parallel(character_ids: &[CharacterId], initiative: Option<&[i32]>) -> Result<(), DomainError> {
    match initiative {
        Some(order) if order.len() != character_ids.len() => Err(DomainError::validation(format!(
            "Initiative order has {} entries but the roster has {}",
            order.len(),
            character_ids.len()
        ))),
        _ => Ok(()),
    }
}
