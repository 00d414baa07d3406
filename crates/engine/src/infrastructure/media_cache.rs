//! Path-keyed cache of decoded media.
//!
//! The cache holds at most one decoded payload per path. It is owned by the
//! media resolver and mutated through `&mut self`, so a lookup followed by an
//! insert for the same path can never interleave with another insert.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use initrack_domain::{DecodedMediaRef, MediaPath};

use crate::infrastructure::ports::MediaDecoderPort;

#[derive(Debug, Default)]
pub struct MediaCache {
    entries: HashMap<MediaPath, DecodedMediaRef>,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_get(&self, path: &MediaPath) -> Option<&DecodedMediaRef> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &MediaPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert a freshly decoded ref under its own path.
    ///
    /// Refuses (and keeps the existing entry) if the path is already cached or
    /// the ref carries no payload. Callers are expected to `try_get` first.
    pub fn insert(&mut self, media: DecodedMediaRef) -> bool {
        if media.is_missing() {
            tracing::warn!(path = %media.path(), "Refusing to cache a missing media ref");
            return false;
        }
        if self.entries.contains_key(media.path()) {
            tracing::warn!(path = %media.path(), "Media already cached, not overwriting");
            return false;
        }
        self.entries.insert(media.path().clone(), media);
        true
    }

    /// Move an entry from `old_path` to `media.path()`.
    ///
    /// Used once per asset, when a transient pick path becomes the persisted
    /// gallery path. A ref without a payload only clears the old key. Returns
    /// any different entry that was displaced at the new path so the caller
    /// can release it.
    ///
    /// With an unchanged path the cached payload is kept and only the record
    /// is refreshed (e.g. to pick up a newly assigned id).
    pub fn replace(&mut self, old_path: &MediaPath, media: DecodedMediaRef) -> Option<DecodedMediaRef> {
        if old_path == media.path() {
            return self.refresh(media);
        }

        self.entries.remove(old_path);
        if media.is_missing() {
            return None;
        }

        let new_path = media.path().clone();
        let displaced = self.entries.insert(new_path.clone(), media)?;
        let replaced_same_payload = self
            .entries
            .get(&new_path)
            .is_some_and(|current| current.shares_payload_with(&displaced));
        if replaced_same_payload {
            None
        } else {
            tracing::warn!(path = %new_path, "Replacing a different cached payload at path");
            Some(displaced)
        }
    }

    fn refresh(&mut self, media: DecodedMediaRef) -> Option<DecodedMediaRef> {
        if media.is_missing() {
            return None;
        }
        match self.entries.entry(media.path().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(media);
                None
            }
            Entry::Occupied(mut slot) if slot.get().shares_payload_with(&media) => {
                *slot.get_mut().record_mut() = media.into_record();
                None
            }
            Entry::Occupied(mut slot) => {
                tracing::warn!(path = %media.path(), "Replacing a different cached payload at path");
                Some(slot.insert(media))
            }
        }
    }

    /// Empty the map, handing every entry back to the caller.
    pub fn drain(&mut self) -> Vec<DecodedMediaRef> {
        self.entries.drain().map(|(_, media)| media).collect()
    }

    /// Release every decoded payload through the decoder and empty the map.
    pub fn clear(&mut self, decoder: &dyn MediaDecoderPort) -> usize {
        let entries = self.drain();
        let released = entries.len();
        for mut media in entries {
            if let Some(payload) = media.take_payload() {
                decoder.release(payload);
            }
        }
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
