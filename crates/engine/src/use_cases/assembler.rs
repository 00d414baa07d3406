//! Aggregate assembly: join stored records with their decoded media, and
//! decompose edited aggregates back into records.

use std::sync::Arc;

use initrack_domain::{
    CharacterAggregate, CharacterRecord, ConfigurationAggregate, ConfigurationId,
    ConfigurationRecord, DecodedMediaRef, DomainError, MediaAssetId, MediaAssetType, RosterEntry,
};

use super::media::MediaResolver;
use super::seed::DEFAULT_CHARACTER_NAME;
use crate::infrastructure::ports::{CharacterRepo, ConfigurationRepo, MediaAssetRepo, RepoError};

/// The configuration the tracker opens with.
pub const CURRENT_CONFIGURATION_ID: ConfigurationId = ConfigurationId::new(1);

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Media {name:?} could not be persisted")]
    UnpersistedMedia { name: String },
    #[error("Character {name:?} does not exist")]
    UnknownCharacter { name: String },
    #[error("Character name cannot be empty")]
    InvalidName,
    #[error("A character named {0:?} already exists")]
    DuplicateName(String),
}

/// Builds and saves aggregates. Owns the media resolver (and so the cache).
pub struct Assembler {
    resolver: MediaResolver,
    assets: Arc<dyn MediaAssetRepo>,
    characters: Arc<dyn CharacterRepo>,
    configurations: Arc<dyn ConfigurationRepo>,
}

impl Assembler {
    pub fn new(
        resolver: MediaResolver,
        assets: Arc<dyn MediaAssetRepo>,
        characters: Arc<dyn CharacterRepo>,
        configurations: Arc<dyn ConfigurationRepo>,
    ) -> Self {
        Self {
            resolver,
            assets,
            characters,
            configurations,
        }
    }

    pub fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut MediaResolver {
        &mut self.resolver
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Resolve the avatar, then every audio clip in declared order.
    pub async fn load_character(
        &mut self,
        record: &CharacterRecord,
    ) -> Result<CharacterAggregate, AssemblyError> {
        let avatar = self
            .resolver
            .resolve_id(record.avatar_asset_id(), MediaAssetType::Avatar)
            .await?;

        let mut audio_clips = Vec::with_capacity(record.audio_asset_ids().len());
        for id in record.audio_asset_ids() {
            audio_clips.push(self.resolver.resolve_id(*id, MediaAssetType::Audio).await?);
        }

        Ok(CharacterAggregate::from_record(record, avatar, audio_clips))
    }

    pub async fn load_character_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<CharacterAggregate>, AssemblyError> {
        let Some(record) = self.characters.get_by_name(name).await? else {
            return Ok(None);
        };
        Ok(Some(self.load_character(&record).await?))
    }

    pub async fn load_default_character(&mut self) -> Result<Option<CharacterAggregate>, AssemblyError> {
        self.load_character_by_name(DEFAULT_CHARACTER_NAME).await
    }

    /// Load the roster in stored order with its initiative, then the backdrop.
    ///
    /// A character id that no longer resolves is dropped together with its
    /// initiative slot, so the two lists stay aligned.
    pub async fn load_configuration(
        &mut self,
        record: &ConfigurationRecord,
    ) -> Result<ConfigurationAggregate, AssemblyError> {
        let initiative = record.initiative_order();
        let mut entries = Vec::with_capacity(record.character_ids().len());

        for (index, id) in record.character_ids().iter().enumerate() {
            let Some(character) = self.characters.get(*id).await? else {
                tracing::warn!(
                    character_id = %id,
                    configuration_id = ?record.id(),
                    "Configuration references a missing character, skipping"
                );
                continue;
            };
            let character = self.load_character(&character).await?;
            let initiative = initiative
                .and_then(|order| order.get(index).copied())
                .unwrap_or(0);
            entries.push(RosterEntry {
                character,
                initiative,
            });
        }

        let background = self
            .resolver
            .resolve_id(record.background_asset_id(), MediaAssetType::Background)
            .await?;

        Ok(ConfigurationAggregate::from_record(record, entries, background))
    }

    pub async fn load_current_configuration(
        &mut self,
    ) -> Result<Option<ConfigurationAggregate>, AssemblyError> {
        let Some(record) = self.configurations.get(CURRENT_CONFIGURATION_ID).await? else {
            return Ok(None);
        };
        Ok(Some(self.load_configuration(&record).await?))
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Persist every media slot in place, then write the character.
    ///
    /// Nothing is written unless every slot ends up with a stored id.
    pub async fn save_character(
        &mut self,
        aggregate: &mut CharacterAggregate,
    ) -> Result<CharacterRecord, AssemblyError> {
        for slot in aggregate.media_mut() {
            *slot = self.resolver.persist(slot.clone()).await;
        }

        let avatar_asset_id = stored_media_id(aggregate.avatar())?;
        let audio_asset_ids = aggregate
            .audio_clips()
            .iter()
            .map(stored_media_id)
            .collect::<Result<Vec<_>, _>>()?;

        let mut record = CharacterRecord::new(
            aggregate.name(),
            avatar_asset_id,
            audio_asset_ids,
            aggregate.created_at(),
        );

        match aggregate.id() {
            Some(id) => {
                record = record.with_identity(id, aggregate.enabled(), aggregate.created_at());
                self.characters.update(&record).await?;
            }
            None => {
                let id = self.characters.insert(&record).await?;
                record.assign_id(id);
                aggregate.set_id(id);
                tracing::info!(character_id = %id, name = aggregate.name(), "Created character");
            }
        }
        Ok(record)
    }

    /// Persist the backdrop, map each roster entry to a stored character id,
    /// and write roster and initiative together.
    ///
    /// Characters are never created here; a roster entry that is neither
    /// stored nor findable by name fails the save.
    pub async fn save_configuration(
        &mut self,
        aggregate: &mut ConfigurationAggregate,
    ) -> Result<ConfigurationRecord, AssemblyError> {
        let background = self.resolver.persist(aggregate.background().clone()).await;
        *aggregate.background_mut() = background;
        let background_asset_id = stored_media_id(aggregate.background())?;

        let mut character_ids = Vec::with_capacity(aggregate.len());
        for character in aggregate.roster() {
            let id = match character.id() {
                Some(id) => id,
                None => self
                    .characters
                    .get_by_name(character.name())
                    .await?
                    .and_then(|record| record.id())
                    .ok_or_else(|| AssemblyError::UnknownCharacter {
                        name: character.name().to_string(),
                    })?,
            };
            character_ids.push(id);
        }

        let mut record = ConfigurationRecord::new(
            character_ids,
            Some(aggregate.initiative()),
            background_asset_id,
            aggregate.created_at(),
        )?;

        match aggregate.id() {
            Some(id) => {
                record = record.with_identity(id, aggregate.enabled(), aggregate.created_at());
                self.configurations.update(&record).await?;
            }
            None => {
                let id = self.configurations.insert(&record).await?;
                record.assign_id(id);
                aggregate.set_id(id);
            }
        }
        Ok(record)
    }

    /// Save a brand-new character, rejecting blank and taken names.
    pub async fn create_character(
        &mut self,
        aggregate: &mut CharacterAggregate,
    ) -> Result<CharacterRecord, AssemblyError> {
        let name = aggregate.name().trim().to_string();
        if name.is_empty() {
            return Err(AssemblyError::InvalidName);
        }
        if aggregate.id().is_some() || self.character_exists(&name).await? {
            return Err(AssemblyError::DuplicateName(name));
        }
        aggregate.rename(name);
        self.save_character(aggregate).await
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn list_character_names(&self) -> Result<Vec<String>, AssemblyError> {
        Ok(self.characters.list_names().await?)
    }

    pub async fn list_asset_names(&self, kind: MediaAssetType) -> Result<Vec<String>, AssemblyError> {
        let records = self.assets.list_by_kind(kind).await?;
        Ok(records.iter().map(|r| r.name().to_string()).collect())
    }

    pub async fn character_exists(&self, name: &str) -> Result<bool, AssemblyError> {
        Ok(self.characters.get_by_name(name).await?.is_some())
    }
}

fn stored_media_id(media: &DecodedMediaRef) -> Result<MediaAssetId, AssemblyError> {
    media.id().ok_or_else(|| AssemblyError::UnpersistedMedia {
        name: media.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use initrack_domain::{AudioBuffer, CharacterId, MediaAssetRecord, MediaPath, Texture};
    use mockall::predicate::eq;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        ClockPort, MediaError, MockCharacterRepo, MockConfigurationRepo, MockGalleryPort,
        MockMediaAssetRepo, MockMediaDecoderPort, MockMediaPickerPort,
    };
    use crate::use_cases::media::MediaServices;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap()
    }

    fn asset(id: i64, kind: MediaAssetType) -> MediaAssetRecord {
        MediaAssetRecord::reconstruct(
            MediaAssetId::new(id),
            true,
            now(),
            format!("asset{}", id),
            kind,
            MediaPath::new(format!("/gallery/asset{}", id)),
        )
    }

    /// Asset repo serving ids 1..=9; even ids are avatars/backgrounds, odd are audio.
    fn asset_repo() -> MockMediaAssetRepo {
        let mut assets = MockMediaAssetRepo::new();
        assets.expect_get().returning(|id| {
            let kind = if id.get() % 2 == 0 {
                MediaAssetType::Avatar
            } else {
                MediaAssetType::Audio
            };
            Ok((1..=9).contains(&id.get()).then(|| asset(id.get(), kind)))
        });
        assets
    }

    fn decoder() -> MockMediaDecoderPort {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .returning(|path| Ok(Texture::new(path.file_stem(), vec![1])));
        decoder
            .expect_decode_audio()
            .returning(|path, format| Ok(AudioBuffer::new(path.file_stem(), format, vec![2])));
        decoder
    }

    fn assembler(
        assets: MockMediaAssetRepo,
        gallery: MockGalleryPort,
        characters: MockCharacterRepo,
        configurations: MockConfigurationRepo,
    ) -> Assembler {
        let assets: Arc<dyn MediaAssetRepo> = Arc::new(assets);
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(now()));
        let resolver = MediaResolver::new(
            assets.clone(),
            MediaServices {
                picker: Arc::new(MockMediaPickerPort::new()),
                gallery: Arc::new(gallery),
                decoder: Arc::new(decoder()),
            },
            clock,
            "DnDIT",
        );
        Assembler::new(resolver, assets, Arc::new(characters), Arc::new(configurations))
    }

    fn audio_ids(aggregate: &CharacterAggregate) -> Vec<i64> {
        aggregate
            .audio_clips()
            .iter()
            .filter_map(|clip| clip.id())
            .map(|id| id.get())
            .collect()
    }

    #[tokio::test]
    async fn load_character_keeps_declared_audio_order() {
        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            MockCharacterRepo::new(),
            MockConfigurationRepo::new(),
        );
        let record = CharacterRecord::reconstruct(
            CharacterId::new(4),
            true,
            now(),
            MediaAssetId::new(2),
            "Goblin".into(),
            vec![MediaAssetId::new(5), MediaAssetId::new(3), MediaAssetId::new(7)],
        );

        let aggregate = assembler.load_character(&record).await.unwrap();

        assert_eq!(aggregate.avatar().id(), Some(MediaAssetId::new(2)));
        assert_eq!(audio_ids(&aggregate), vec![5, 3, 7]);
        assert!(aggregate.audio_clips().iter().all(|clip| !clip.is_missing()));
    }

    #[tokio::test]
    async fn unchanged_character_saves_back_to_the_same_record() {
        let record = CharacterRecord::reconstruct(
            CharacterId::new(4),
            true,
            now(),
            MediaAssetId::new(2),
            "Goblin".into(),
            vec![MediaAssetId::new(5), MediaAssetId::new(3)],
        );
        let expected = record.clone();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_update()
            .withf(move |written| *written == expected)
            .times(1)
            .returning(|_| Ok(()));
        characters.expect_insert().never();

        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            characters,
            MockConfigurationRepo::new(),
        );
        let mut aggregate = assembler.load_character(&record).await.unwrap();
        let saved = assembler.save_character(&mut aggregate).await.unwrap();

        assert_eq!(saved, record);
    }

    #[tokio::test]
    async fn save_character_refuses_unpersisted_media() {
        let mut gallery = MockGalleryPort::new();
        gallery
            .expect_persist_audio()
            .returning(|_, _, _| Err(MediaError::Cancelled));
        let mut characters = MockCharacterRepo::new();
        characters.expect_insert().never();
        characters.expect_update().never();

        let mut assembler = assembler(asset_repo(), gallery, characters, MockConfigurationRepo::new());
        let avatar = assembler
            .resolver_mut()
            .resolve(asset(2, MediaAssetType::Avatar))
            .await;
        let transient = DecodedMediaRef::missing(MediaAssetRecord::new(
            "roar",
            MediaAssetType::Audio,
            MediaPath::new("/tmp/roar.ogg"),
            now(),
        ));
        let mut aggregate = CharacterAggregate::new("Owlbear", avatar, vec![transient], now());

        let err = assembler.save_character(&mut aggregate).await.unwrap_err();
        assert!(matches!(err, AssemblyError::UnpersistedMedia { ref name } if name == "roar"));
        assert_eq!(aggregate.id(), None);
    }

    #[tokio::test]
    async fn load_configuration_skips_missing_characters_with_their_slot() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|id| {
            Ok((id.get() != 2).then(|| {
                CharacterRecord::reconstruct(
                    id,
                    true,
                    now(),
                    MediaAssetId::new(2),
                    format!("hero{}", id.get()),
                    vec![],
                )
            }))
        });

        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            characters,
            MockConfigurationRepo::new(),
        );
        let record = ConfigurationRecord::reconstruct(
            ConfigurationId::new(1),
            true,
            now(),
            vec![CharacterId::new(3), CharacterId::new(2), CharacterId::new(1)],
            Some(vec![20, 15, 10]),
            MediaAssetId::new(4),
        )
        .unwrap();

        let config = assembler.load_configuration(&record).await.unwrap();

        let names: Vec<_> = config.roster().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["hero3", "hero1"]);
        assert_eq!(config.initiative(), vec![20, 10]);
        assert_eq!(config.background().id(), Some(MediaAssetId::new(4)));
    }

    #[tokio::test]
    async fn load_configuration_without_initiative_uses_zero() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|id| {
            Ok(Some(CharacterRecord::reconstruct(
                id,
                true,
                now(),
                MediaAssetId::new(2),
                "solo".into(),
                vec![],
            )))
        });
        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            characters,
            MockConfigurationRepo::new(),
        );
        let record = ConfigurationRecord::reconstruct(
            ConfigurationId::new(1),
            true,
            now(),
            vec![CharacterId::new(1)],
            None,
            MediaAssetId::new(4),
        )
        .unwrap();

        let config = assembler.load_configuration(&record).await.unwrap();
        assert_eq!(config.initiative(), vec![0]);
    }

    #[tokio::test]
    async fn malformed_character_list_aborts_configuration_load() {
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(|id| Err(RepoError::malformed_id_list("Character", id.get(), "1,,2")));
        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            characters,
            MockConfigurationRepo::new(),
        );
        let record = ConfigurationRecord::reconstruct(
            ConfigurationId::new(1),
            true,
            now(),
            vec![CharacterId::new(1)],
            Some(vec![3]),
            MediaAssetId::new(4),
        )
        .unwrap();

        let err = assembler.load_configuration(&record).await.unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Repo(RepoError::MalformedIdList { .. })
        ));
    }

    #[tokio::test]
    async fn save_configuration_looks_up_unsaved_characters_by_name() {
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get_by_name()
            .with(eq("Rogue"))
            .returning(|_| {
                Ok(Some(CharacterRecord::reconstruct(
                    CharacterId::new(8),
                    true,
                    now(),
                    MediaAssetId::new(2),
                    "Rogue".into(),
                    vec![],
                )))
            });
        let mut configurations = MockConfigurationRepo::new();
        configurations
            .expect_insert()
            .withf(|record| {
                record.character_ids() == [CharacterId::new(8)]
                    && record.initiative_order() == Some(&[14][..])
                    && record.background_asset_id() == MediaAssetId::new(4)
            })
            .returning(|_| Ok(ConfigurationId::new(1)));

        let mut assembler = assembler(asset_repo(), MockGalleryPort::new(), characters, configurations);
        let background = assembler
            .resolver_mut()
            .resolve(asset(4, MediaAssetType::Background))
            .await;
        let avatar = assembler
            .resolver_mut()
            .resolve(asset(2, MediaAssetType::Avatar))
            .await;
        let mut config = ConfigurationAggregate::new(background, now());
        config.push(CharacterAggregate::new("Rogue", avatar, vec![], now()), 14);

        let record = assembler.save_configuration(&mut config).await.unwrap();

        assert_eq!(record.id(), Some(ConfigurationId::new(1)));
        assert_eq!(config.id(), Some(ConfigurationId::new(1)));
    }

    #[tokio::test]
    async fn save_configuration_never_creates_characters() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get_by_name().returning(|_| Ok(None));
        characters.expect_insert().never();
        let mut configurations = MockConfigurationRepo::new();
        configurations.expect_insert().never();

        let mut assembler = assembler(asset_repo(), MockGalleryPort::new(), characters, configurations);
        let background = assembler
            .resolver_mut()
            .resolve(asset(4, MediaAssetType::Background))
            .await;
        let mut config = ConfigurationAggregate::new(background.clone(), now());
        config.push(CharacterAggregate::new("Stranger", background, vec![], now()), 1);

        let err = assembler.save_configuration(&mut config).await.unwrap_err();
        assert!(matches!(err, AssemblyError::UnknownCharacter { ref name } if name == "Stranger"));
    }

    #[tokio::test]
    async fn create_character_rejects_blank_and_duplicate_names() {
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get_by_name()
            .with(eq("Goblin"))
            .returning(|_| {
                Ok(Some(CharacterRecord::reconstruct(
                    CharacterId::new(1),
                    true,
                    now(),
                    MediaAssetId::new(2),
                    "Goblin".into(),
                    vec![],
                )))
            });
        characters.expect_insert().never();

        let mut assembler = assembler(
            asset_repo(),
            MockGalleryPort::new(),
            characters,
            MockConfigurationRepo::new(),
        );
        let avatar = assembler
            .resolver_mut()
            .resolve(asset(2, MediaAssetType::Avatar))
            .await;

        let mut blank = CharacterAggregate::new("   ", avatar.clone(), vec![], now());
        assert!(matches!(
            assembler.create_character(&mut blank).await,
            Err(AssemblyError::InvalidName)
        ));

        let mut duplicate = CharacterAggregate::new(" Goblin ", avatar, vec![], now());
        assert!(matches!(
            assembler.create_character(&mut duplicate).await,
            Err(AssemblyError::DuplicateName(name)) if name == "Goblin"
        ));
    }

    #[tokio::test]
    async fn list_asset_names_by_kind() {
        let mut assets = MockMediaAssetRepo::new();
        assets
            .expect_list_by_kind()
            .with(eq(MediaAssetType::Audio))
            .returning(|_| Ok(vec![asset(1, MediaAssetType::Audio), asset(3, MediaAssetType::Audio)]));
        let assembler = assembler(
            assets,
            MockGalleryPort::new(),
            MockCharacterRepo::new(),
            MockConfigurationRepo::new(),
        );

        let names = assembler.list_asset_names(MediaAssetType::Audio).await.unwrap();
        assert_eq!(names, vec!["asset1", "asset3"]);
    }
}
