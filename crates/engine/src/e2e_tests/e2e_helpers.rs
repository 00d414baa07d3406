//! E2E test helpers for constructing the full application stack.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use initrack_domain::{AudioBuffer, AudioFormat, DecodedMedia, MediaPath, Texture};
use tempfile::TempDir;

use crate::app::{App, Repositories};
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::fs_media::FsMediaService;
use crate::infrastructure::ports::{MediaDecoderPort, MediaError, MediaPickerPort};
use crate::infrastructure::sqlite::{SqliteRepositories, SqliteStore};
use crate::use_cases::seed::DEFAULT_AUDIO_NAMES;
use crate::use_cases::MediaServices;

pub const TEST_ALBUM: &str = "DnDIT";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap()
}

// =============================================================================
// Scripted Picker
// =============================================================================

/// Hands out queued paths in order, then behaves like a cancelled dialog.
pub struct ScriptedPicker {
    queue: Mutex<VecDeque<MediaPath>>,
    files: Arc<FsMediaService>,
}

impl ScriptedPicker {
    pub fn new(files: Arc<FsMediaService>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            files,
        }
    }

    pub fn queue(&self, path: MediaPath) {
        self.queue.lock().unwrap().push_back(path);
    }

    fn next(&self) -> Option<MediaPath> {
        self.queue.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl MediaPickerPort for ScriptedPicker {
    async fn pick_image_path(&self) -> Option<MediaPath> {
        self.next()
    }

    async fn pick_audio_path(&self) -> Option<MediaPath> {
        self.next()
    }

    async fn pick_file(&self, _extension: &str) -> Option<MediaPath> {
        self.next()
    }

    async fn read_text(&self, path: &MediaPath) -> Result<String, MediaError> {
        self.files.read_text(path).await
    }
}

// =============================================================================
// Counting Decoder
// =============================================================================

/// Counts decodes and releases on top of the filesystem decoder.
pub struct CountingDecoder {
    inner: Arc<FsMediaService>,
    decodes: AtomicUsize,
    releases: AtomicUsize,
}

impl CountingDecoder {
    pub fn new(inner: Arc<FsMediaService>) -> Self {
        Self {
            inner,
            decodes: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    pub fn decodes(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaDecoderPort for CountingDecoder {
    async fn decode_image(&self, path: &MediaPath) -> Result<Texture, MediaError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.inner.decode_image(path).await
    }

    async fn decode_audio(
        &self,
        path: &MediaPath,
        format: AudioFormat,
    ) -> Result<AudioBuffer, MediaError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.inner.decode_audio(path, format).await
    }

    fn release(&self, media: DecodedMedia) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.inner.release(media);
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A fully wired app over an in-memory database and a temp directory.
pub struct E2EHarness {
    pub app: App,
    pub store: SqliteStore,
    pub picker: Arc<ScriptedPicker>,
    pub decoder: Arc<CountingDecoder>,
    dir: TempDir,
}

impl E2EHarness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let files = Arc::new(FsMediaService::new(
            dir.path().join("assets"),
            dir.path().join("gallery"),
        ));
        let picker = Arc::new(ScriptedPicker::new(files.clone()));
        let decoder = Arc::new(CountingDecoder::new(files.clone()));

        let store = SqliteStore::in_memory().await.expect("open store");
        let sqlite = SqliteRepositories::new(store.clone())
            .await
            .expect("create tables");

        let media = MediaServices {
            picker: picker.clone(),
            gallery: files,
            decoder: decoder.clone(),
        };
        let app = App::new(
            Repositories::from_sqlite(&sqlite),
            media,
            Arc::new(FixedClock(fixed_now())),
            TEST_ALBUM,
        );

        Self {
            app,
            store,
            picker,
            decoder,
            dir,
        }
    }

    /// Harness with the bundled default media on disk.
    pub async fn with_bundled_defaults() -> Self {
        let harness = Self::new().await;
        harness.write_bundled("Textures/DefaultAvatar.png", b"avatar").await;
        harness.write_bundled("Textures/DefaultBG.png", b"background").await;
        for name in DEFAULT_AUDIO_NAMES {
            harness
                .write_bundled(&format!("Audios/{}.ogg", name), name.as_bytes())
                .await;
        }
        harness
    }

    pub fn gallery_album(&self) -> PathBuf {
        self.dir.path().join("gallery").join(TEST_ALBUM)
    }

    pub async fn write_bundled(&self, relative: &str, bytes: &[u8]) {
        write_file(self.dir.path().join("assets").join(relative), bytes).await;
    }

    /// Write a file outside the gallery, as a user pick would find it.
    pub async fn write_incoming(&self, file_name: &str, bytes: &[u8]) -> MediaPath {
        let path = self.incoming_path(file_name);
        write_file(PathBuf::from(path.as_str()), bytes).await;
        path
    }

    /// Path under the incoming directory, whether or not the file exists.
    pub fn incoming_path(&self, file_name: &str) -> MediaPath {
        let path = self.dir.path().join("incoming").join(file_name);
        MediaPath::new(path.to_string_lossy().into_owned())
    }
}

async fn write_file(path: PathBuf, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.expect("create dirs");
    }
    tokio::fs::write(&path, bytes).await.expect("write file");
}
