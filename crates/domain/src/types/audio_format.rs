//! Audio container hint inferred from a file extension.

use serde::{Deserialize, Serialize};

/// Format hint handed to the audio decoder.
///
/// Unrecognised extensions map to [`AudioFormat::Unknown`]; decoders are still
/// asked to try, since many of them sniff the header anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    Mpeg,
    Wav,
    OggVorbis,
    Aiff,
    Mod,
    It,
    S3m,
    Xm,
    Xma,
    Vag,
    Aac,
    Unknown,
}

impl AudioFormat {
    /// Look up the format for an extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "mp3" | "mp2" => Self::Mpeg,
            "wav" => Self::Wav,
            "ogg" => Self::OggVorbis,
            "aiff" | "aif" => Self::Aiff,
            "mod" => Self::Mod,
            "it" => Self::It,
            "s3m" => Self::S3m,
            "xm" => Self::Xm,
            "xma" => Self::Xma,
            "vag" => Self::Vag,
            // "acc" shows up in older saved paths as a misspelling of aac
            "aac" | "acc" => Self::Aac,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &str) -> Self {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::from_extension(ext),
            _ => Self::Unknown,
        }
    }
}
