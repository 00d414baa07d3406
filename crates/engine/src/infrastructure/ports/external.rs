//! Platform media service ports (pick, persist-copy, decode).

use async_trait::async_trait;
use initrack_domain::{AudioBuffer, AudioFormat, DecodedMedia, MediaPath, Texture};

use super::error::MediaError;

/// Where the gallery service actually put a copy, and under what name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMedia {
    pub path: MediaPath,
    pub name: String,
}

/// File picker. Every pick may come back empty (cancel, permission denied).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaPickerPort: Send + Sync {
    async fn pick_image_path(&self) -> Option<MediaPath>;
    async fn pick_audio_path(&self) -> Option<MediaPath>;
    /// Pick a file of the given extension (without the dot).
    async fn pick_file(&self, extension: &str) -> Option<MediaPath>;
    async fn read_text(&self, path: &MediaPath) -> Result<String, MediaError>;
}

/// Copies picked media into durable app-managed storage.
///
/// On some platforms this is a no-op and the returned values equal the inputs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryPort: Send + Sync {
    async fn persist_image(
        &self,
        path: &MediaPath,
        album: &str,
        desired_name: &str,
    ) -> Result<PersistedMedia, MediaError>;
    async fn persist_audio(
        &self,
        path: &MediaPath,
        album: &str,
        desired_name: &str,
    ) -> Result<PersistedMedia, MediaError>;
}

/// Loads files into usable in-memory resources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaDecoderPort: Send + Sync {
    async fn decode_image(&self, path: &MediaPath) -> Result<Texture, MediaError>;
    async fn decode_audio(
        &self,
        path: &MediaPath,
        format: AudioFormat,
    ) -> Result<AudioBuffer, MediaError>;
    /// Dispose of a payload the cache no longer holds.
    fn release(&self, media: DecodedMedia);
}
