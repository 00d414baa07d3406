//! Repository port traits for the relational store.

use async_trait::async_trait;
use initrack_domain::{
    CharacterId, CharacterRecord, ConfigurationId, ConfigurationRecord, MediaAssetId,
    MediaAssetRecord, MediaAssetType,
};

use super::error::RepoError;

// =============================================================================
// Database Ports (one per table)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaAssetRepo: Send + Sync {
    /// Store a new record and return the id the store assigned.
    async fn insert(&self, record: &MediaAssetRecord) -> Result<MediaAssetId, RepoError>;
    async fn update(&self, record: &MediaAssetRecord) -> Result<(), RepoError>;
    async fn get(&self, id: MediaAssetId) -> Result<Option<MediaAssetRecord>, RepoError>;

    // Queries
    async fn get_by_name_and_kind(
        &self,
        name: &str,
        kind: MediaAssetType,
    ) -> Result<Option<MediaAssetRecord>, RepoError>;
    async fn list_by_kind(&self, kind: MediaAssetType) -> Result<Vec<MediaAssetRecord>, RepoError>;
    async fn is_empty(&self) -> Result<bool, RepoError>;
    async fn exists(&self, id: MediaAssetId) -> Result<bool, RepoError>;
    async fn count(&self) -> Result<i64, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn insert(&self, record: &CharacterRecord) -> Result<CharacterId, RepoError>;
    async fn update(&self, record: &CharacterRecord) -> Result<(), RepoError>;
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterRecord>, RepoError>;

    // Queries
    async fn get_by_name(&self, name: &str) -> Result<Option<CharacterRecord>, RepoError>;
    async fn list_all(&self) -> Result<Vec<CharacterRecord>, RepoError>;
    async fn list_names(&self) -> Result<Vec<String>, RepoError>;
    async fn is_empty(&self) -> Result<bool, RepoError>;
    async fn count(&self) -> Result<i64, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigurationRepo: Send + Sync {
    async fn insert(&self, record: &ConfigurationRecord) -> Result<ConfigurationId, RepoError>;
    async fn update(&self, record: &ConfigurationRecord) -> Result<(), RepoError>;
    async fn get(&self, id: ConfigurationId) -> Result<Option<ConfigurationRecord>, RepoError>;
    async fn is_empty(&self) -> Result<bool, RepoError>;
    async fn count(&self) -> Result<i64, RepoError>;
}
