//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod fs_media;
pub mod media_cache;
pub mod ports;
pub mod sqlite;
