//! Domain types for the initiative tracker's media store.
//!
//! Everything here is plain data plus validation. Persistence, decoding and
//! caching live in `initrack-engine`.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use aggregates::{
    AudioBuffer, CharacterAggregate, ConfigurationAggregate, DecodedMedia, DecodedMediaRef,
    RosterEntry, Texture,
};
pub use entities::{CharacterRecord, ConfigurationRecord, MediaAssetRecord};
pub use error::DomainError;
pub use ids::{CharacterId, ConfigurationId, MediaAssetId};
pub use types::{AudioFormat, MediaAssetType};
pub use value_objects::{encode_id_list, parse_id_list, MediaPath, BUNDLED_TAG};
