//! Shared vocabulary types.
//!
//! Pure data enumerations with no I/O; every type is serializable.

mod asset_types;
pub use asset_types::MediaAssetType;

mod audio_format;
pub use audio_format::AudioFormat;
