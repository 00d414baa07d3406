//! Row mapping for the three record tables.
//!
//! Id lists are stored as comma-delimited text and decoded here, once. A list
//! that does not parse rejects the row.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use initrack_domain::{
    encode_id_list, parse_id_list, CharacterId, CharacterRecord, ConfigurationId,
    ConfigurationRecord, DomainError, MediaAssetId, MediaAssetRecord, MediaAssetType, MediaPath,
};

use super::store::{SqliteQuery, Table};
use crate::infrastructure::ports::RepoError;

fn column<'r, T>(row: &'r SqliteRow, name: &'static str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn id_list<T: std::str::FromStr>(
    entity_type: &'static str,
    id: i64,
    raw: &str,
) -> Result<Vec<T>, RepoError> {
    parse_id_list(raw).map_err(|e| {
        tracing::error!(
            entity = entity_type,
            record_id = id,
            raw = %raw,
            error = %e,
            "Malformed id list, rejecting record"
        );
        RepoError::malformed_id_list(entity_type, id, raw)
    })
}

// =============================================================================
// media_asset
// =============================================================================

impl Table for MediaAssetRecord {
    const NAME: &'static str = "media_asset";
    const ENTITY: &'static str = "MediaAsset";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("enabled", "INTEGER NOT NULL"),
        ("created_at", "TEXT NOT NULL"),
        ("name", "TEXT NOT NULL"),
        ("kind", "INTEGER NOT NULL"),
        ("path", "TEXT NOT NULL"),
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.enabled())
            .bind(self.created_at())
            .bind(self.name())
            .bind(self.kind().code())
            .bind(self.path().as_str())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, RepoError> {
        let id: i64 = column(row, "id")?;
        let kind = MediaAssetType::from_code(column(row, "kind")?)
            .map_err(|e: DomainError| RepoError::serialization(e))?;
        let path: String = column(row, "path")?;
        Ok(Self::reconstruct(
            MediaAssetId::new(id),
            column(row, "enabled")?,
            column::<DateTime<Utc>>(row, "created_at")?,
            column(row, "name")?,
            kind,
            MediaPath::new(path),
        ))
    }
}

// =============================================================================
// character
// =============================================================================

impl Table for CharacterRecord {
    const NAME: &'static str = "character";
    const ENTITY: &'static str = "Character";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("enabled", "INTEGER NOT NULL"),
        ("created_at", "TEXT NOT NULL"),
        ("avatar_asset_id", "INTEGER NOT NULL"),
        ("name", "TEXT NOT NULL"),
        ("audio_asset_ids", "TEXT NOT NULL DEFAULT ''"),
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.enabled())
            .bind(self.created_at())
            .bind(self.avatar_asset_id().get())
            .bind(self.name())
            .bind(encode_id_list(self.audio_asset_ids()))
    }

    fn from_row(row: &SqliteRow) -> Result<Self, RepoError> {
        let id: i64 = column(row, "id")?;
        let raw_audio: String = column(row, "audio_asset_ids")?;
        let audio_asset_ids: Vec<MediaAssetId> = id_list(Self::ENTITY, id, &raw_audio)?;
        Ok(Self::reconstruct(
            CharacterId::new(id),
            column(row, "enabled")?,
            column::<DateTime<Utc>>(row, "created_at")?,
            MediaAssetId::new(column(row, "avatar_asset_id")?),
            column(row, "name")?,
            audio_asset_ids,
        ))
    }
}

// =============================================================================
// configuration
// =============================================================================

impl Table for ConfigurationRecord {
    const NAME: &'static str = "configuration";
    const ENTITY: &'static str = "Configuration";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("enabled", "INTEGER NOT NULL"),
        ("created_at", "TEXT NOT NULL"),
        ("character_ids", "TEXT NOT NULL DEFAULT ''"),
        ("initiative_order", "TEXT"),
        ("background_asset_id", "INTEGER NOT NULL"),
    ];

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.enabled())
            .bind(self.created_at())
            .bind(encode_id_list(self.character_ids()))
            .bind(self.initiative_order().map(encode_id_list))
            .bind(self.background_asset_id().get())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, RepoError> {
        let id: i64 = column(row, "id")?;
        let raw_characters: String = column(row, "character_ids")?;
        let character_ids: Vec<CharacterId> = id_list(Self::ENTITY, id, &raw_characters)?;
        let raw_initiative: Option<String> = column(row, "initiative_order")?;
        let initiative_order = raw_initiative
            .as_deref()
            .map(|raw| id_list::<i32>(Self::ENTITY, id, raw))
            .transpose()?;

        Self::reconstruct(
            ConfigurationId::new(id),
            column(row, "enabled")?,
            column::<DateTime<Utc>>(row, "created_at")?,
            character_ids,
            initiative_order,
            MediaAssetId::new(column(row, "background_asset_id")?),
        )
        .map_err(|e| {
            tracing::error!(record_id = id, error = %e, "Configuration row is inconsistent");
            RepoError::serialization(e)
        })
    }
}
