//! SQLite implementations of the repository ports.

use async_trait::async_trait;
use initrack_domain::{
    CharacterId, CharacterRecord, ConfigurationId, ConfigurationRecord, MediaAssetId,
    MediaAssetRecord, MediaAssetType,
};

use super::store::{Filter, SqliteStore, Table};
use crate::infrastructure::ports::{CharacterRepo, ConfigurationRepo, MediaAssetRepo, RepoError};

fn stored_id<T: Table>(id: Option<i64>) -> Result<i64, RepoError> {
    id.ok_or_else(|| {
        RepoError::constraint(format!("{} has not been stored yet, cannot update", T::ENTITY))
    })
}

/// All repositories over one database.
#[derive(Clone)]
pub struct SqliteRepositories {
    pub store: SqliteStore,
    pub media_assets: SqliteMediaAssetRepo,
    pub characters: SqliteCharacterRepo,
    pub configurations: SqliteConfigurationRepo,
}

impl SqliteRepositories {
    /// Create any missing tables and wrap them in repositories.
    pub async fn new(store: SqliteStore) -> Result<Self, RepoError> {
        Ok(Self {
            media_assets: SqliteMediaAssetRepo::new(store.clone()).await?,
            characters: SqliteCharacterRepo::new(store.clone()).await?,
            configurations: SqliteConfigurationRepo::new(store.clone()).await?,
            store,
        })
    }
}

// =============================================================================
// Media assets
// =============================================================================

#[derive(Clone)]
pub struct SqliteMediaAssetRepo {
    store: SqliteStore,
}

impl SqliteMediaAssetRepo {
    pub async fn new(store: SqliteStore) -> Result<Self, RepoError> {
        store.create_table::<MediaAssetRecord>().await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl MediaAssetRepo for SqliteMediaAssetRepo {
    async fn insert(&self, record: &MediaAssetRecord) -> Result<MediaAssetId, RepoError> {
        let id = self.store.insert(record).await?;
        Ok(MediaAssetId::new(id))
    }

    async fn update(&self, record: &MediaAssetRecord) -> Result<(), RepoError> {
        let id = stored_id::<MediaAssetRecord>(record.id().map(MediaAssetId::get))?;
        self.store.update(id, record).await
    }

    async fn get(&self, id: MediaAssetId) -> Result<Option<MediaAssetRecord>, RepoError> {
        self.store.get_by_id(id.get()).await
    }

    async fn get_by_name_and_kind(
        &self,
        name: &str,
        kind: MediaAssetType,
    ) -> Result<Option<MediaAssetRecord>, RepoError> {
        let filter = Filter::eq("name", name).and_eq("kind", kind.code());
        self.store.get_by(&filter).await
    }

    async fn list_by_kind(&self, kind: MediaAssetType) -> Result<Vec<MediaAssetRecord>, RepoError> {
        self.store.get_all_by(&Filter::eq("kind", kind.code())).await
    }

    async fn is_empty(&self) -> Result<bool, RepoError> {
        self.store.is_table_empty::<MediaAssetRecord>().await
    }

    async fn exists(&self, id: MediaAssetId) -> Result<bool, RepoError> {
        self.store.exists::<MediaAssetRecord>(id.get()).await
    }

    async fn count(&self) -> Result<i64, RepoError> {
        self.store.count::<MediaAssetRecord>().await
    }
}

// =============================================================================
// Characters
// =============================================================================

#[derive(Clone)]
pub struct SqliteCharacterRepo {
    store: SqliteStore,
}

impl SqliteCharacterRepo {
    pub async fn new(store: SqliteStore) -> Result<Self, RepoError> {
        store.create_table::<CharacterRecord>().await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn insert(&self, record: &CharacterRecord) -> Result<CharacterId, RepoError> {
        let id = self.store.insert(record).await?;
        Ok(CharacterId::new(id))
    }

    async fn update(&self, record: &CharacterRecord) -> Result<(), RepoError> {
        let id = stored_id::<CharacterRecord>(record.id().map(CharacterId::get))?;
        self.store.update(id, record).await
    }

    async fn get(&self, id: CharacterId) -> Result<Option<CharacterRecord>, RepoError> {
        self.store.get_by_id(id.get()).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CharacterRecord>, RepoError> {
        self.store.get_by(&Filter::eq("name", name)).await
    }

    async fn list_all(&self) -> Result<Vec<CharacterRecord>, RepoError> {
        self.store.get_all().await
    }

    /// Names only, so one malformed audio list does not hide every name.
    async fn list_names(&self) -> Result<Vec<String>, RepoError> {
        self.store.column_values::<CharacterRecord>("name").await
    }

    async fn is_empty(&self) -> Result<bool, RepoError> {
        self.store.is_table_empty::<CharacterRecord>().await
    }

    async fn count(&self) -> Result<i64, RepoError> {
        self.store.count::<CharacterRecord>().await
    }
}

// =============================================================================
// Configurations
// =============================================================================

#[derive(Clone)]
pub struct SqliteConfigurationRepo {
    store: SqliteStore,
}

impl SqliteConfigurationRepo {
    pub async fn new(store: SqliteStore) -> Result<Self, RepoError> {
        store.create_table::<ConfigurationRecord>().await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl ConfigurationRepo for SqliteConfigurationRepo {
    async fn insert(&self, record: &ConfigurationRecord) -> Result<ConfigurationId, RepoError> {
        let id = self.store.insert(record).await?;
        Ok(ConfigurationId::new(id))
    }

    async fn update(&self, record: &ConfigurationRecord) -> Result<(), RepoError> {
        let id = stored_id::<ConfigurationRecord>(record.id().map(ConfigurationId::get))?;
        self.store.update(id, record).await
    }

    async fn get(&self, id: ConfigurationId) -> Result<Option<ConfigurationRecord>, RepoError> {
        self.store.get_by_id(id.get()).await
    }

    async fn is_empty(&self) -> Result<bool, RepoError> {
        self.store.is_table_empty::<ConfigurationRecord>().await
    }

    async fn count(&self) -> Result<i64, RepoError> {
        self.store.count::<ConfigurationRecord>().await
    }
}
