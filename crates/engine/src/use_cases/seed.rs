//! First-run seeding of default media, character and configuration.

use std::sync::Arc;

use initrack_domain::{
    CharacterId, CharacterRecord, ConfigurationId, ConfigurationRecord, MediaAssetId,
    MediaAssetRecord, MediaAssetType, MediaPath,
};

use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, ConfigurationRepo, MediaAssetRepo, RepoError,
};

pub const DEFAULT_AVATAR_NAME: &str = "DefaultAvatar";
pub const DEFAULT_BACKGROUND_NAME: &str = "DefaultBG";
pub const DEFAULT_CHARACTER_NAME: &str = "DefaultCharacter";
pub const DEFAULT_AUDIO_NAMES: [&str; 3] = ["DefaultAudio1", "DefaultAudio2", "DefaultAudio3"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded {
        media_assets: usize,
        character: CharacterId,
        configuration: ConfigurationId,
    },
    /// At least one table already had rows; nothing was written.
    Skipped,
}

/// Seed defaults use case.
pub struct SeedDefaults {
    assets: Arc<dyn MediaAssetRepo>,
    characters: Arc<dyn CharacterRepo>,
    configurations: Arc<dyn ConfigurationRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SeedDefaults {
    pub fn new(
        assets: Arc<dyn MediaAssetRepo>,
        characters: Arc<dyn CharacterRepo>,
        configurations: Arc<dyn ConfigurationRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            assets,
            characters,
            configurations,
            clock,
        }
    }

    /// Seed an empty database. Never partially re-applied.
    pub async fn execute(&self) -> Result<SeedOutcome, RepoError> {
        let empty = self.assets.is_empty().await?
            && self.characters.is_empty().await?
            && self.configurations.is_empty().await?;
        if !empty {
            tracing::info!("Database already populated, skipping seeding");
            return Ok(SeedOutcome::Skipped);
        }

        self.insert_asset(
            DEFAULT_AVATAR_NAME,
            MediaAssetType::Avatar,
            "Textures/DefaultAvatar",
        )
        .await?;
        let background = self
            .insert_asset(
                DEFAULT_BACKGROUND_NAME,
                MediaAssetType::Background,
                "Textures/DefaultBG",
            )
            .await?;
        for name in DEFAULT_AUDIO_NAMES {
            self.insert_asset(name, MediaAssetType::Audio, &format!("Audios/{}", name))
                .await?;
        }

        let character = self.add_default_character().await?;

        let configuration = ConfigurationRecord::new(vec![], Some(vec![]), background, self.clock.now())
            .map_err(RepoError::constraint)?;
        let configuration = self.configurations.insert(&configuration).await?;

        let media_assets = 2 + DEFAULT_AUDIO_NAMES.len();
        tracing::info!(
            media_assets,
            character_id = %character,
            configuration_id = %configuration,
            "Seeded default records"
        );
        Ok(SeedOutcome::Seeded {
            media_assets,
            character,
            configuration,
        })
    }

    /// Insert the default character over the already-seeded default media.
    pub async fn add_default_character(&self) -> Result<CharacterId, RepoError> {
        let avatar = self.default_asset(DEFAULT_AVATAR_NAME, MediaAssetType::Avatar).await?;
        let mut audio = Vec::with_capacity(DEFAULT_AUDIO_NAMES.len());
        for name in DEFAULT_AUDIO_NAMES {
            audio.push(self.default_asset(name, MediaAssetType::Audio).await?);
        }

        let record = CharacterRecord::new(DEFAULT_CHARACTER_NAME, avatar, audio, self.clock.now());
        self.characters.insert(&record).await
    }

    async fn insert_asset(
        &self,
        name: &str,
        kind: MediaAssetType,
        bundled_path: &str,
    ) -> Result<MediaAssetId, RepoError> {
        let record = MediaAssetRecord::new(
            name,
            kind,
            MediaPath::bundled(bundled_path),
            self.clock.now(),
        );
        self.assets.insert(&record).await
    }

    async fn default_asset(&self, name: &str, kind: MediaAssetType) -> Result<MediaAssetId, RepoError> {
        self.assets
            .get_by_name_and_kind(name, kind)
            .await?
            .and_then(|record| record.id())
            .ok_or_else(|| RepoError::not_found("MediaAsset", name))
    }
}
