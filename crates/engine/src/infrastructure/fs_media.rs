//! Local filesystem stand-in for the platform media services.
//!
//! Decoding reads the file's bytes, persisting copies the file into
//! `{gallery_dir}/{album}/`, and there is no interactive picker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use initrack_domain::{AudioBuffer, AudioFormat, DecodedMedia, MediaPath, Texture};

use crate::infrastructure::ports::{
    GalleryPort, MediaDecoderPort, MediaError, MediaPickerPort, PersistedMedia,
};

pub struct FsMediaService {
    media_root: PathBuf,
    gallery_dir: PathBuf,
}

impl FsMediaService {
    pub fn new(media_root: impl Into<PathBuf>, gallery_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            gallery_dir: gallery_dir.into(),
        }
    }

    /// Map a media path to a file on disk.
    ///
    /// Bundled paths are relative to the media root and usually carry no
    /// extension, so a sibling with the same stem is accepted.
    async fn locate(&self, path: &MediaPath) -> Result<PathBuf, MediaError> {
        let Some(relative) = path.bundled_relative() else {
            return Ok(PathBuf::from(path.as_str()));
        };

        let exact = self.media_root.join(relative);
        if tokio::fs::try_exists(&exact).await.unwrap_or(false) {
            return Ok(exact);
        }

        let parent = exact.parent().unwrap_or(self.media_root.as_path()).to_path_buf();
        let stem = path.file_stem().to_string();
        let mut entries = match tokio::fs::read_dir(&parent).await {
            Ok(entries) => entries,
            Err(_) => return Err(MediaError::NotFound(path.to_string())),
        };
        while let Some(entry) = entries.next_entry().await? {
            let candidate = entry.path();
            if candidate.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()) {
                return Ok(candidate);
            }
        }
        Err(MediaError::NotFound(path.to_string()))
    }

    async fn read_media(&self, path: &MediaPath) -> Result<Vec<u8>, MediaError> {
        let file = self.locate(path).await?;
        let bytes = tokio::fs::read(&file).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MediaError::NotFound(path.to_string()),
            _ => MediaError::Io(e),
        })?;
        if bytes.is_empty() {
            return Err(MediaError::Decode(format!("{} is empty", path)));
        }
        Ok(bytes)
    }

    async fn copy_into_album(
        &self,
        path: &MediaPath,
        album: &str,
        desired_name: &str,
    ) -> Result<PersistedMedia, MediaError> {
        let source = self.locate(path).await?;
        let album_dir = self.gallery_dir.join(album);
        tokio::fs::create_dir_all(&album_dir).await?;

        let extension = path.extension().map(|ext| format!(".{}", ext)).unwrap_or_default();
        let (target, name) = free_name(&album_dir, desired_name, &extension).await;
        tokio::fs::copy(&source, &target)
            .await
            .map_err(|e| MediaError::Persist(format!("{}: {}", target.display(), e)))?;

        Ok(PersistedMedia {
            path: MediaPath::new(target.to_string_lossy().into_owned()),
            name,
        })
    }
}

/// First `name`, `name_1`, `name_2`, ... that is not taken in `dir`.
async fn free_name(dir: &Path, desired: &str, extension: &str) -> (PathBuf, String) {
    let mut name = desired.to_string();
    let mut suffix = 0;
    loop {
        let candidate = dir.join(format!("{}{}", name, extension));
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return (candidate, name);
        }
        suffix += 1;
        name = format!("{}_{}", desired, suffix);
    }
}

#[async_trait]
impl MediaPickerPort for FsMediaService {
    async fn pick_image_path(&self) -> Option<MediaPath> {
        tracing::debug!("No interactive picker on this platform");
        None
    }

    async fn pick_audio_path(&self) -> Option<MediaPath> {
        tracing::debug!("No interactive picker on this platform");
        None
    }

    async fn pick_file(&self, extension: &str) -> Option<MediaPath> {
        tracing::debug!(extension, "No interactive picker on this platform");
        None
    }

    async fn read_text(&self, path: &MediaPath) -> Result<String, MediaError> {
        let file = self.locate(path).await?;
        Ok(tokio::fs::read_to_string(file).await?)
    }
}

#[async_trait]
impl GalleryPort for FsMediaService {
    async fn persist_image(
        &self,
        path: &MediaPath,
        album: &str,
        desired_name: &str,
    ) -> Result<PersistedMedia, MediaError> {
        self.copy_into_album(path, album, desired_name).await
    }

    async fn persist_audio(
        &self,
        path: &MediaPath,
        album: &str,
        desired_name: &str,
    ) -> Result<PersistedMedia, MediaError> {
        self.copy_into_album(path, album, desired_name).await
    }
}

#[async_trait]
impl MediaDecoderPort for FsMediaService {
    async fn decode_image(&self, path: &MediaPath) -> Result<Texture, MediaError> {
        let bytes = self.read_media(path).await?;
        Ok(Texture::new(path.file_stem(), bytes))
    }

    async fn decode_audio(
        &self,
        path: &MediaPath,
        format: AudioFormat,
    ) -> Result<AudioBuffer, MediaError> {
        let bytes = self.read_media(path).await?;
        Ok(AudioBuffer::new(path.file_stem(), format, bytes))
    }

    fn release(&self, media: DecodedMedia) {
        tracing::debug!(name = media.name(), "Releasing decoded media");
        drop(media);
    }
}
