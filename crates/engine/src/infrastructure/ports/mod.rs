//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Relational storage (one repo per table)
//! - Platform media services (picker, gallery persist-copy, decoder)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterRepo, ConfigurationRepo, MediaAssetRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{GalleryPort, MediaDecoderPort, MediaPickerPort, PersistedMedia};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockConfigurationRepo, MockMediaAssetRepo};

#[cfg(test)]
pub use external::{MockGalleryPort, MockMediaDecoderPort, MockMediaPickerPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{MediaError, RepoError};
