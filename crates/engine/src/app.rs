//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{CharacterRepo, ClockPort, ConfigurationRepo, MediaAssetRepo, RepoError},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{
    batch_import, Assembler, BatchImportError, ImportReport, MediaResolver, MediaServices,
    SeedDefaults, SeedOutcome,
};

/// Main application state.
///
/// Owns the assembler, and through it the media resolver and its cache, so
/// dropping or tearing down the app is the only way decoded media goes away.
pub struct App {
    pub repositories: Repositories,
    pub assembler: Assembler,
    pub seed: SeedDefaults,
}

/// Container for the repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub media_assets: Arc<dyn MediaAssetRepo>,
    pub characters: Arc<dyn CharacterRepo>,
    pub configurations: Arc<dyn ConfigurationRepo>,
}

impl Repositories {
    pub fn from_sqlite(repos: &SqliteRepositories) -> Self {
        Self {
            media_assets: Arc::new(repos.media_assets.clone()),
            characters: Arc::new(repos.characters.clone()),
            configurations: Arc::new(repos.configurations.clone()),
        }
    }
}

impl App {
    pub fn new(
        repositories: Repositories,
        media: MediaServices,
        clock: Arc<dyn ClockPort>,
        album: impl Into<String>,
    ) -> Self {
        let resolver = MediaResolver::new(
            repositories.media_assets.clone(),
            media,
            clock.clone(),
            album,
        );
        let assembler = Assembler::new(
            resolver,
            repositories.media_assets.clone(),
            repositories.characters.clone(),
            repositories.configurations.clone(),
        );
        let seed = SeedDefaults::new(
            repositories.media_assets.clone(),
            repositories.characters.clone(),
            repositories.configurations.clone(),
            clock,
        );

        Self {
            repositories,
            assembler,
            seed,
        }
    }

    /// Seed an empty database.
    pub async fn bootstrap(&self) -> Result<SeedOutcome, RepoError> {
        self.seed.execute().await
    }

    pub async fn import_characters(&mut self, payload: &str) -> Result<ImportReport, BatchImportError> {
        batch_import::import_characters(&mut self.assembler, payload).await
    }

    pub async fn import_from_picker(&mut self) -> Result<Option<ImportReport>, BatchImportError> {
        batch_import::import_from_picker(&mut self.assembler).await
    }

    /// Release every decoded payload held by the media cache.
    pub fn teardown(&mut self) -> usize {
        self.assembler.resolver_mut().teardown()
    }
}
