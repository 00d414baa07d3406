//! Media asset type enumeration

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Kind of media asset (determines which decoder loads it and which slot
/// of an aggregate it can occupy).
///
/// Persisted as a small integer in the `kind` column; the discriminants are
/// part of the on-disk format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaAssetType {
    /// Character portrait
    Avatar,
    /// Character voice/sound clip
    Audio,
    /// Encounter backdrop
    Background,
}

impl MediaAssetType {
    pub const ALL: [MediaAssetType; 3] = [Self::Avatar, Self::Audio, Self::Background];

    /// Integer code stored in the database.
    pub fn code(self) -> i64 {
        match self {
            Self::Avatar => 0,
            Self::Audio => 1,
            Self::Background => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Avatar),
            1 => Ok(Self::Audio),
            2 => Ok(Self::Background),
            _ => Err(DomainError::parse(format!(
                "Unknown media asset type code: {}",
                code
            ))),
        }
    }

    /// Avatars and backgrounds both decode to textures.
    pub fn is_image(self) -> bool {
        matches!(self, Self::Avatar | Self::Background)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::Audio => "audio",
            Self::Background => "background",
        }
    }
}

impl std::fmt::Display for MediaAssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Avatar => write!(f, "Avatar"),
            Self::Audio => write!(f, "Audio"),
            Self::Background => write!(f, "Background"),
        }
    }
}

impl std::str::FromStr for MediaAssetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avatar" | "image" => Ok(Self::Avatar),
            "audio" => Ok(Self::Audio),
            "background" | "bg" => Ok(Self::Background),
            _ => Err(DomainError::parse(format!("Unknown media asset type: {}", s))),
        }
    }
}
