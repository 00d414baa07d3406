//! Use cases - orchestration over the store and the media services.

pub mod assembler;
pub mod batch_import;
pub mod media;
pub mod seed;

pub use assembler::{Assembler, AssemblyError, CURRENT_CONFIGURATION_ID};
pub use batch_import::{BatchImportError, ImportEntry, ImportReport};
pub use media::{MediaResolver, MediaServices};
pub use seed::{SeedDefaults, SeedOutcome};
