//! Media resolution: records in, decoded media out.
//!
//! The resolver owns the media cache. Decode and persist failures never
//! surface as errors here; they come back as missing refs (decode) or as
//! refs without an id (persist), and callers branch on that.

use std::sync::Arc;

use initrack_domain::{
    AudioFormat, DecodedMedia, DecodedMediaRef, MediaAssetId, MediaAssetRecord, MediaAssetType,
    MediaPath,
};

use crate::infrastructure::media_cache::MediaCache;
use crate::infrastructure::ports::{
    ClockPort, GalleryPort, MediaAssetRepo, MediaDecoderPort, MediaError, MediaPickerPort,
    RepoError,
};

/// Platform media services the resolver talks to.
#[derive(Clone)]
pub struct MediaServices {
    pub picker: Arc<dyn MediaPickerPort>,
    pub gallery: Arc<dyn GalleryPort>,
    pub decoder: Arc<dyn MediaDecoderPort>,
}

pub struct MediaResolver {
    assets: Arc<dyn MediaAssetRepo>,
    media: MediaServices,
    clock: Arc<dyn ClockPort>,
    album: String,
    cache: MediaCache,
}

impl MediaResolver {
    pub fn new(
        assets: Arc<dyn MediaAssetRepo>,
        media: MediaServices,
        clock: Arc<dyn ClockPort>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            assets,
            media,
            clock,
            album: album.into(),
            cache: MediaCache::new(),
        }
    }

    pub fn cache(&self) -> &MediaCache {
        &self.cache
    }

    pub fn picker(&self) -> &Arc<dyn MediaPickerPort> {
        &self.media.picker
    }

    /// An unstored record for a freshly picked file, named after the file.
    pub fn transient_record(&self, kind: MediaAssetType, path: MediaPath) -> MediaAssetRecord {
        let name = path.file_stem().to_string();
        MediaAssetRecord::new(name, kind, path, self.clock.now())
    }

    /// Decode `record`'s file, or reuse the cached payload for its path.
    pub async fn resolve(&mut self, record: MediaAssetRecord) -> DecodedMediaRef {
        if let Some(payload) = self.cache.try_get(record.path()).and_then(|hit| hit.payload()) {
            tracing::debug!(path = %record.path(), "Media cache hit");
            let payload = payload.clone();
            return DecodedMediaRef::loaded(record, payload);
        }

        if record.path().is_empty() {
            tracing::warn!(name = record.name(), "Media record has no path");
            return DecodedMediaRef::missing(record);
        }

        match self.decode(&record).await {
            Ok(payload) => {
                let media = DecodedMediaRef::loaded(record, payload);
                self.cache.insert(media.clone());
                media
            }
            Err(e) => {
                tracing::warn!(
                    path = %record.path(),
                    kind = %record.kind(),
                    error = %e,
                    "Failed to decode media"
                );
                DecodedMediaRef::missing(record)
            }
        }
    }

    async fn decode(&self, record: &MediaAssetRecord) -> Result<DecodedMedia, MediaError> {
        let path = record.path();
        if record.kind().is_image() {
            let texture = self.media.decoder.decode_image(path).await?;
            return Ok(DecodedMedia::Texture(Arc::new(texture.with_name(record.name()))));
        }

        let format = AudioFormat::from_path(path.as_str());
        if format == AudioFormat::Unknown {
            tracing::debug!(path = %path, "Unknown audio format, attempting decode anyway");
        }
        let audio = self.media.decoder.decode_audio(path, format).await?;
        Ok(DecodedMedia::Audio(Arc::new(audio.with_name(record.name()))))
    }

    /// Look a record up by id and resolve it.
    ///
    /// An id with no record yields a missing ref that still carries the id, so
    /// the owning aggregate keeps its reference intact.
    pub async fn resolve_id(
        &mut self,
        id: MediaAssetId,
        kind: MediaAssetType,
    ) -> Result<DecodedMediaRef, RepoError> {
        match self.assets.get(id).await? {
            Some(record) => Ok(self.resolve(record).await),
            None => {
                tracing::warn!(asset_id = %id, kind = %kind, "Referenced media asset does not exist");
                let placeholder = MediaAssetRecord::reconstruct(
                    id,
                    true,
                    self.clock.now(),
                    String::new(),
                    kind,
                    MediaPath::new(""),
                );
                Ok(DecodedMediaRef::missing(placeholder))
            }
        }
    }

    pub async fn resolve_by_name(
        &mut self,
        name: &str,
        kind: MediaAssetType,
    ) -> Result<Option<DecodedMediaRef>, RepoError> {
        let Some(record) = self.assets.get_by_name_and_kind(name, kind).await? else {
            return Ok(None);
        };
        Ok(Some(self.resolve(record).await))
    }

    /// Pick a file from the gallery and decode it. `None` if the user cancels.
    ///
    /// The result is transient: it has no id until [`persist`](Self::persist).
    pub async fn import_from_gallery(&mut self, kind: MediaAssetType) -> Option<DecodedMediaRef> {
        let picked = if kind.is_image() {
            self.media.picker.pick_image_path().await
        } else {
            self.media.picker.pick_audio_path().await
        };
        let Some(path) = picked.filter(|p| !p.is_empty()) else {
            tracing::debug!(kind = %kind, "Media pick cancelled");
            return None;
        };
        let record = self.transient_record(kind, path);
        Some(self.resolve(record).await)
    }

    /// Copy a transient ref into durable storage and store its record.
    ///
    /// Refs that already have an id come back untouched. Bundled media is
    /// already durable and is stored as is. On a gallery or store failure the
    /// ref comes back unchanged, still cached under its original path, so the
    /// caller can tell by `id()` and a retry starts from the original file.
    pub async fn persist(&mut self, mut media: DecodedMediaRef) -> DecodedMediaRef {
        if media.id().is_some() {
            return media;
        }
        let original = media.clone();

        if !media.path().is_bundled() {
            let old_path = media.path().clone();
            let kind = media.record().kind();
            let result = if kind.is_image() {
                self.media
                    .gallery
                    .persist_image(&old_path, &self.album, media.name())
                    .await
            } else {
                self.media
                    .gallery
                    .persist_audio(&old_path, &self.album, media.name())
                    .await
            };

            match result {
                Ok(persisted) => {
                    media.record_mut().relocate(persisted.path, persisted.name);
                    let displaced = self.cache.replace(&old_path, media.clone());
                    self.release(displaced);
                }
                Err(e) => {
                    tracing::error!(path = %old_path, error = %e, "Failed to persist media copy");
                    return media;
                }
            }
        }

        match self.assets.insert(media.record()).await {
            Ok(id) => {
                media.record_mut().assign_id(id);
                let path = media.path().clone();
                let displaced = self.cache.replace(&path, media.clone());
                self.release(displaced);
                tracing::debug!(asset_id = %id, path = %path, "Persisted media asset");
            }
            Err(e) => {
                tracing::error!(path = %media.path(), error = %e, "Failed to store media asset");
                if media.path() != original.path() {
                    // The gallery copy stays behind; only the ref and cache key move back.
                    let displaced = self.cache.replace(media.path(), original.clone());
                    self.release(displaced);
                }
                return original;
            }
        }
        media
    }

    fn release(&self, displaced: Option<DecodedMediaRef>) {
        if let Some(payload) = displaced.and_then(|mut media| media.take_payload()) {
            self.media.decoder.release(payload);
        }
    }

    /// Release every cached payload. Returns how many entries were dropped.
    pub fn teardown(&mut self) -> usize {
        let released = self.cache.clear(self.media.decoder.as_ref());
        tracing::info!(released, "Media cache torn down");
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use initrack_domain::{AudioBuffer, Texture};
    use mockall::predicate::eq;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockGalleryPort, MockMediaAssetRepo, MockMediaDecoderPort, MockMediaPickerPort,
        PersistedMedia,
    };

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap()))
    }

    fn resolver(
        assets: MockMediaAssetRepo,
        picker: MockMediaPickerPort,
        gallery: MockGalleryPort,
        decoder: MockMediaDecoderPort,
    ) -> MediaResolver {
        MediaResolver::new(
            Arc::new(assets),
            MediaServices {
                picker: Arc::new(picker),
                gallery: Arc::new(gallery),
                decoder: Arc::new(decoder),
            },
            clock(),
            "DnDIT",
        )
    }

    fn record(name: &str, kind: MediaAssetType, path: &str) -> MediaAssetRecord {
        MediaAssetRecord::new(
            name,
            kind,
            MediaPath::new(path),
            Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn resolving_twice_decodes_once() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .times(1)
            .returning(|_| Ok(Texture::new("raw", vec![1])));

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            decoder,
        );
        let avatar = record("goblin", MediaAssetType::Avatar, "/g/goblin.png");

        let first = resolver.resolve(avatar.clone()).await;
        let second = resolver.resolve(avatar).await;

        assert!(first.shares_payload_with(&second));
        assert_eq!(first.payload().unwrap().name(), "goblin");
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn decode_failure_is_missing_and_uncached() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_audio()
            .with(eq(MediaPath::new("/gone/roar.ogg")), eq(AudioFormat::OggVorbis))
            .times(2)
            .returning(|path, _| Err(MediaError::NotFound(path.to_string())));

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            decoder,
        );
        let clip = record("roar", MediaAssetType::Audio, "/gone/roar.ogg");

        assert!(resolver.resolve(clip.clone()).await.is_missing());
        assert!(!resolver.cache().contains(clip.path()));
        // Second attempt goes back to the decoder.
        assert!(resolver.resolve(clip).await.is_missing());
    }

    #[tokio::test]
    async fn unknown_audio_extension_still_decodes() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_audio()
            .with(eq(MediaPath::new("/g/chant.flac")), eq(AudioFormat::Unknown))
            .returning(|_, format| Ok(AudioBuffer::new("chant", format, vec![7])));

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            decoder,
        );
        let media = resolver
            .resolve(record("chant", MediaAssetType::Audio, "/g/chant.flac"))
            .await;
        assert!(!media.is_missing());
    }

    #[tokio::test]
    async fn resolve_id_for_unknown_asset_keeps_the_id() {
        let mut assets = MockMediaAssetRepo::new();
        assets
            .expect_get()
            .with(eq(MediaAssetId::new(99)))
            .returning(|_| Ok(None));

        let mut resolver = resolver(
            assets,
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            MockMediaDecoderPort::new(),
        );
        let media = resolver
            .resolve_id(MediaAssetId::new(99), MediaAssetType::Audio)
            .await
            .unwrap();

        assert!(media.is_missing());
        assert_eq!(media.id(), Some(MediaAssetId::new(99)));
        assert_eq!(media.record().kind(), MediaAssetType::Audio);
    }

    #[tokio::test]
    async fn persist_moves_cache_key_and_stores_record() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .times(1)
            .returning(|_| Ok(Texture::new("goblin", vec![1])));

        let mut gallery = MockGalleryPort::new();
        gallery
            .expect_persist_image()
            .withf(|path, album, name| {
                path.as_str() == "/tmp/pick/goblin.png" && album == "DnDIT" && name == "goblin"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(PersistedMedia {
                    path: MediaPath::new("/gallery/DnDIT/goblin_1.png"),
                    name: "goblin_1".into(),
                })
            });

        let mut assets = MockMediaAssetRepo::new();
        assets
            .expect_insert()
            .withf(|record| {
                record.path().as_str() == "/gallery/DnDIT/goblin_1.png" && record.name() == "goblin_1"
            })
            .times(1)
            .returning(|_| Ok(MediaAssetId::new(12)));

        let mut resolver = resolver(assets, MockMediaPickerPort::new(), gallery, decoder);
        let transient = resolver
            .resolve(record("goblin", MediaAssetType::Avatar, "/tmp/pick/goblin.png"))
            .await;
        let old_path = transient.path().clone();

        let persisted = resolver.persist(transient.clone()).await;

        assert_eq!(persisted.id(), Some(MediaAssetId::new(12)));
        assert!(resolver.cache().try_get(&old_path).is_none());
        let cached = resolver.cache().try_get(persisted.path()).unwrap();
        assert!(cached.shares_payload_with(&transient));
        assert_eq!(cached.id(), Some(MediaAssetId::new(12)));

        // Already stored: no further gallery or store calls.
        let again = resolver.persist(persisted).await;
        assert_eq!(again.id(), Some(MediaAssetId::new(12)));
    }

    #[tokio::test]
    async fn persist_gallery_failure_returns_ref_unchanged() {
        let mut gallery = MockGalleryPort::new();
        gallery
            .expect_persist_audio()
            .returning(|_, _, _| Err(MediaError::Persist("disk full".into())));

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            MockMediaPickerPort::new(),
            gallery,
            MockMediaDecoderPort::new(),
        );
        let transient = DecodedMediaRef::missing(record("roar", MediaAssetType::Audio, "/tmp/roar.ogg"));

        let result = resolver.persist(transient).await;

        assert_eq!(result.id(), None);
        assert_eq!(result.path().as_str(), "/tmp/roar.ogg");
    }

    #[tokio::test]
    async fn persist_store_failure_restores_ref_and_cache_key() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .times(1)
            .returning(|_| Ok(Texture::new("goblin", vec![1])));

        // Both attempts copy from the picked file, never from an earlier copy.
        let mut gallery = MockGalleryPort::new();
        gallery
            .expect_persist_image()
            .withf(|path, _, name| path.as_str() == "/tmp/pick/goblin.png" && name == "goblin")
            .times(2)
            .returning(|_, _, _| {
                Ok(PersistedMedia {
                    path: MediaPath::new("/gallery/DnDIT/goblin.png"),
                    name: "goblin".into(),
                })
            });

        let mut assets = MockMediaAssetRepo::new();
        let mut attempts = 0;
        assets.expect_insert().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(RepoError::database("insert", "database is locked"))
            } else {
                Ok(MediaAssetId::new(4))
            }
        });

        let mut resolver = resolver(assets, MockMediaPickerPort::new(), gallery, decoder);
        let transient = resolver
            .resolve(record("goblin", MediaAssetType::Avatar, "/tmp/pick/goblin.png"))
            .await;

        let failed = resolver.persist(transient.clone()).await;

        assert_eq!(failed.id(), None);
        assert_eq!(failed.path(), transient.path());
        assert_eq!(failed.name(), "goblin");
        assert!(resolver.cache().contains(transient.path()));
        assert!(!resolver
            .cache()
            .contains(&MediaPath::new("/gallery/DnDIT/goblin.png")));

        let retried = resolver.persist(failed).await;

        assert_eq!(retried.id(), Some(MediaAssetId::new(4)));
        assert_eq!(retried.path().as_str(), "/gallery/DnDIT/goblin.png");
        assert!(!resolver.cache().contains(transient.path()));
        assert!(resolver.cache().try_get(retried.path()).unwrap().shares_payload_with(&transient));
    }

    #[tokio::test]
    async fn persist_bundled_skips_gallery() {
        let mut assets = MockMediaAssetRepo::new();
        assets
            .expect_insert()
            .withf(|record| record.path().as_str() == "bundled://Audios/DefaultAudio1")
            .times(1)
            .returning(|_| Ok(MediaAssetId::new(3)));

        let mut resolver = resolver(
            assets,
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            MockMediaDecoderPort::new(),
        );
        let bundled = DecodedMediaRef::missing(MediaAssetRecord::new(
            "DefaultAudio1",
            MediaAssetType::Audio,
            MediaPath::bundled("Audios/DefaultAudio1"),
            Utc::now(),
        ));

        let result = resolver.persist(bundled).await;
        assert_eq!(result.id(), Some(MediaAssetId::new(3)));
    }

    #[tokio::test]
    async fn import_from_gallery_cancel_is_none() {
        let mut picker = MockMediaPickerPort::new();
        picker.expect_pick_audio_path().returning(|| None);

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            picker,
            MockGalleryPort::new(),
            MockMediaDecoderPort::new(),
        );
        assert!(resolver.import_from_gallery(MediaAssetType::Audio).await.is_none());
    }

    #[tokio::test]
    async fn import_from_gallery_names_after_file() {
        let mut picker = MockMediaPickerPort::new();
        picker
            .expect_pick_image_path()
            .returning(|| Some(MediaPath::new("/tmp/pick/owlbear.jpg")));
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .returning(|_| Ok(Texture::new("x", vec![1])));

        let mut resolver = resolver(MockMediaAssetRepo::new(), picker, MockGalleryPort::new(), decoder);
        let media = resolver
            .import_from_gallery(MediaAssetType::Background)
            .await
            .unwrap();

        assert_eq!(media.name(), "owlbear");
        assert_eq!(media.id(), None);
        assert_eq!(media.record().kind(), MediaAssetType::Background);
    }

    #[tokio::test]
    async fn teardown_releases_cached_payloads() {
        let mut decoder = MockMediaDecoderPort::new();
        decoder
            .expect_decode_image()
            .returning(|_| Ok(Texture::new("x", vec![1])));
        decoder.expect_release().times(2).return_const(());

        let mut resolver = resolver(
            MockMediaAssetRepo::new(),
            MockMediaPickerPort::new(),
            MockGalleryPort::new(),
            decoder,
        );
        resolver.resolve(record("a", MediaAssetType::Avatar, "/a.png")).await;
        resolver.resolve(record("b", MediaAssetType::Background, "/b.png")).await;

        assert_eq!(resolver.teardown(), 2);
        assert!(resolver.cache().is_empty());
    }
}
