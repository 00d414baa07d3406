//! Media path value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a path relative to the media bundled with the application.
pub const BUNDLED_TAG: &str = "bundled://";

/// Location of a media file: either bundled (tagged, relative to the bundled
/// media root) or a user/gallery path as returned by the platform.
///
/// The path is also the media cache key, so equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaPath(String);

impl MediaPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build a bundled-origin path from a path relative to the bundled root.
    pub fn bundled(relative: &str) -> Self {
        Self(format!(
            "{}{}",
            BUNDLED_TAG,
            relative.trim_start_matches(['/', '\\'])
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn is_bundled(&self) -> bool {
        self.0.starts_with(BUNDLED_TAG)
    }

    /// Path relative to the bundled root, if this is a bundled path.
    pub fn bundled_relative(&self) -> Option<&str> {
        self.0.strip_prefix(BUNDLED_TAG)
    }

    /// Last path segment, tag stripped.
    pub fn file_name(&self) -> &str {
        let untagged = self.bundled_relative().unwrap_or(&self.0);
        untagged.rsplit(['/', '\\']).next().unwrap_or(untagged)
    }

    /// File name without its extension. Used to name freshly picked media.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        match self.file_name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MediaPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MediaPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
