//! Configuration aggregate - the encounter roster, turn order and backdrop

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::{CharacterAggregate, ConfigurationId, ConfigurationRecord, DecodedMediaRef};

/// One roster slot: a character and its initiative roll.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub character: CharacterAggregate,
    pub initiative: i32,
}

/// The encounter as the tracker shows it.
///
/// Roster and initiative are stored as pairs, so any reordering moves both
/// together. [`roster`](Self::roster) and [`initiative`](Self::initiative)
/// expose them as the parallel lists the record persists.
#[derive(Debug, Clone)]
pub struct ConfigurationAggregate {
    id: Option<ConfigurationId>,
    enabled: bool,
    created_at: DateTime<Utc>,
    entries: Vec<RosterEntry>,
    background: DecodedMediaRef,
}

impl ConfigurationAggregate {
    pub fn new(background: DecodedMediaRef, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            enabled: true,
            created_at: now,
            entries: Vec::new(),
            background,
        }
    }

    /// Join a stored record with its resolved roster entries.
    pub fn from_record(
        record: &ConfigurationRecord,
        entries: Vec<RosterEntry>,
        background: DecodedMediaRef,
    ) -> Self {
        Self {
            id: record.id(),
            enabled: record.enabled(),
            created_at: record.created_at(),
            entries,
            background,
        }
    }

    /// Build from parallel lists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the lists differ in length.
    pub fn from_parallel(
        roster: Vec<CharacterAggregate>,
        initiative: Vec<i32>,
        background: DecodedMediaRef,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if roster.len() != initiative.len() {
            return Err(DomainError::validation(format!(
                "Roster has {} characters but {} initiative values",
                roster.len(),
                initiative.len()
            )));
        }
        let entries = roster
            .into_iter()
            .zip(initiative)
            .map(|(character, initiative)| RosterEntry {
                character,
                initiative,
            })
            .collect();
        Ok(Self {
            entries,
            ..Self::new(background, now)
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

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn roster(&self) -> impl Iterator<Item = &CharacterAggregate> {
        self.entries.iter().map(|entry| &entry.character)
    }

    pub fn initiative(&self) -> Vec<i32> {
        self.entries.iter().map(|entry| entry.initiative).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn background(&self) -> &DecodedMediaRef {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut DecodedMediaRef {
        &mut self.background
    }

    pub fn set_id(&mut self, id: ConfigurationId) {
        self.id = Some(id);
    }

    pub fn push(&mut self, character: CharacterAggregate, initiative: i32) {
        self.entries.push(RosterEntry {
            character,
            initiative,
        });
    }

    pub fn remove(&mut self, index: usize) -> Option<RosterEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Returns false when `index` is out of range.
    pub fn set_initiative(&mut self, index: usize, value: i32) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.initiative = value;
                true
            }
            None => false,
        }
    }

    /// Highest initiative first. Ties keep their current order.
    pub fn sort_by_initiative(&mut self) {
        self.entries.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    }

    /// Swap in a new backdrop, returning the old one.
    pub fn replace_background(&mut self, background: DecodedMediaRef) -> DecodedMediaRef {
        std::mem::replace(&mut self.background, background)
    }
}
