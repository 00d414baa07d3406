//! Decoded media payloads and the cache unit pairing them with their record.

use std::sync::Arc;

use crate::{AudioFormat, MediaAssetId, MediaAssetRecord, MediaPath};

/// An image decoded by the platform, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    name: String,
    bytes: Vec<u8>,
}

impl Texture {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// An audio clip decoded by the platform, ready to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    name: String,
    format: AudioFormat,
    bytes: Vec<u8>,
}

impl AudioBuffer {
    pub fn new(name: impl Into<String>, format: AudioFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A decoded resource. Clones share the underlying payload.
#[derive(Debug, Clone)]
pub enum DecodedMedia {
    Texture(Arc<Texture>),
    Audio(Arc<AudioBuffer>),
}

impl DecodedMedia {
    pub fn name(&self) -> &str {
        match self {
            Self::Texture(texture) => texture.name(),
            Self::Audio(audio) => audio.name(),
        }
    }

    /// True when both handles point at the same decoded payload.
    pub fn same_payload(&self, other: &DecodedMedia) -> bool {
        match (self, other) {
            (Self::Texture(a), Self::Texture(b)) => Arc::ptr_eq(a, b),
            (Self::Audio(a), Self::Audio(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_texture(&self) -> Option<&Arc<Texture>> {
        match self {
            Self::Texture(texture) => Some(texture),
            Self::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&Arc<AudioBuffer>> {
        match self {
            Self::Audio(audio) => Some(audio),
            Self::Texture(_) => None,
        }
    }
}

/// A media record together with its decoded payload.
///
/// A ref without a payload is the "missing" sentinel: the record is known but
/// its file could not be loaded. Aggregates keep missing refs in place so the
/// rest of the aggregate still loads.
#[derive(Debug, Clone)]
pub struct DecodedMediaRef {
    record: MediaAssetRecord,
    payload: Option<DecodedMedia>,
}

impl DecodedMediaRef {
    pub fn loaded(record: MediaAssetRecord, payload: DecodedMedia) -> Self {
        Self {
            record,
            payload: Some(payload),
        }
    }

    pub fn missing(record: MediaAssetRecord) -> Self {
        Self {
            record,
            payload: None,
        }
    }

    pub fn record(&self) -> &MediaAssetRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut MediaAssetRecord {
        &mut self.record
    }

    pub fn into_record(self) -> MediaAssetRecord {
        self.record
    }

    pub fn payload(&self) -> Option<&DecodedMedia> {
        self.payload.as_ref()
    }

    pub fn take_payload(&mut self) -> Option<DecodedMedia> {
        self.payload.take()
    }

    pub fn is_missing(&self) -> bool {
        self.payload.is_none()
    }

    pub fn id(&self) -> Option<MediaAssetId> {
        self.record.id()
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn path(&self) -> &MediaPath {
        self.record.path()
    }

    /// True when both refs carry the very same decoded payload.
    pub fn shares_payload_with(&self, other: &DecodedMediaRef) -> bool {
        match (&self.payload, &other.payload) {
            (Some(a), Some(b)) => a.same_payload(b),
            _ => false,
        }
    }
}
