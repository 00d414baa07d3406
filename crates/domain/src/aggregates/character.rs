//! Character aggregate - a character record joined with its decoded media

use chrono::{DateTime, Utc};

use crate::{CharacterId, CharacterRecord, DecodedMediaRef};

/// A character ready for display: avatar plus voice clips in declared order.
#[derive(Debug, Clone)]
pub struct CharacterAggregate {
    id: Option<CharacterId>,
    enabled: bool,
    created_at: DateTime<Utc>,
    avatar: DecodedMediaRef,
    name: String,
    audio_clips: Vec<DecodedMediaRef>,
}

impl CharacterAggregate {
    /// A character that has not been saved yet.
    pub fn new(
        name: impl Into<String>,
        avatar: DecodedMediaRef,
        audio_clips: Vec<DecodedMediaRef>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            enabled: true,
            created_at: now,
            avatar,
            name: name.into(),
            audio_clips,
        }
    }

    /// Join a stored record with media already resolved in the record's order.
    pub fn from_record(
        record: &CharacterRecord,
        avatar: DecodedMediaRef,
        audio_clips: Vec<DecodedMediaRef>,
    ) -> Self {
        Self {
            id: record.id(),
            enabled: record.enabled(),
            created_at: record.created_at(),
            avatar,
            name: record.name().to_string(),
            audio_clips,
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

    pub fn avatar(&self) -> &DecodedMediaRef {
        &self.avatar
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn audio_clips(&self) -> &[DecodedMediaRef] {
        &self.audio_clips
    }

    pub fn set_id(&mut self, id: CharacterId) {
        self.id = Some(id);
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_avatar(&mut self, avatar: DecodedMediaRef) {
        self.avatar = avatar;
    }

    pub fn push_audio(&mut self, clip: DecodedMediaRef) {
        self.audio_clips.push(clip);
    }

    pub fn remove_audio(&mut self, index: usize) -> Option<DecodedMediaRef> {
        (index < self.audio_clips.len()).then(|| self.audio_clips.remove(index))
    }

    /// Every media slot, avatar first, for persisting in place.
    pub fn media_mut(&mut self) -> impl Iterator<Item = &mut DecodedMediaRef> {
        std::iter::once(&mut self.avatar).chain(self.audio_clips.iter_mut())
    }
}
