//! Aggregates - records joined with their decoded media
//!
//! These are assembled on load and decomposed on save; they are never stored
//! as tables of their own.

mod character;
mod configuration;
mod media;

pub use character::CharacterAggregate;
pub use configuration::{ConfigurationAggregate, RosterEntry};
pub use media::{AudioBuffer, DecodedMedia, DecodedMediaRef, Texture};
