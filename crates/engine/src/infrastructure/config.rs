//! Engine configuration from environment variables.

use std::path::PathBuf;

/// Where the engine keeps its database and media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite database file
    pub db_path: String,
    /// Root that `bundled://` paths are relative to
    pub media_root: PathBuf,
    /// Directory persisted copies are written under
    pub gallery_dir: PathBuf,
    /// Album (sub-directory) name handed to the gallery service
    pub album: String,
    /// Optional batch-import file run at startup
    pub import_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: "initrack.db".into(),
            media_root: PathBuf::from("assets"),
            gallery_dir: PathBuf::from("gallery"),
            album: "DnDIT".into(),
            import_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            db_path: var("INITRACK_DB").unwrap_or(defaults.db_path),
            media_root: var("INITRACK_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            gallery_dir: var("INITRACK_GALLERY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.gallery_dir),
            album: var("INITRACK_ALBUM").unwrap_or(defaults.album),
            import_path: var("INITRACK_IMPORT").map(PathBuf::from),
        }
    }
}
