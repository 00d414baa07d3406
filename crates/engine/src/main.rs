//! Initrack Engine - Main entry point.
//!
//! Opens the database, seeds it on first run, runs an optional batch import
//! and loads the current configuration.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use initrack_engine::app::{App, Repositories};
use initrack_engine::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    fs_media::FsMediaService,
    ports::{ClockPort, MediaPickerPort},
    sqlite::{SqliteRepositories, SqliteStore},
};
use initrack_engine::use_cases::{MediaServices, SeedOutcome};
use initrack_domain::MediaPath;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary usually runs from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "initrack_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Initrack Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    tracing::info!(db = %config.db_path, "Opening database");
    let store = SqliteStore::open(&config.db_path).await?;
    let sqlite = SqliteRepositories::new(store.clone()).await?;

    let fs_media = Arc::new(FsMediaService::new(&config.media_root, &config.gallery_dir));
    let media = MediaServices {
        picker: fs_media.clone(),
        gallery: fs_media.clone(),
        decoder: fs_media.clone(),
    };

    let mut app = App::new(
        Repositories::from_sqlite(&sqlite),
        media,
        clock,
        config.album.clone(),
    );

    match app.bootstrap().await? {
        SeedOutcome::Seeded { media_assets, .. } => {
            tracing::info!(media_assets, "Seeded a fresh database");
        }
        SeedOutcome::Skipped => {}
    }

    if let Some(import_path) = &config.import_path {
        let path = MediaPath::new(import_path.to_string_lossy());
        let payload = fs_media.read_text(&path).await?;
        let report = app.import_characters(&payload).await?;
        for (name, reason) in &report.failed {
            tracing::warn!(name = %name, reason = %reason, "Import entry failed");
        }
    }

    match app.assembler.load_current_configuration().await? {
        Some(configuration) => {
            let roster: Vec<_> = configuration
                .entries()
                .iter()
                .map(|entry| format!("{} ({})", entry.character.name(), entry.initiative))
                .collect();
            tracing::info!(
                characters = configuration.len(),
                background = %configuration.background().name(),
                roster = ?roster,
                "Loaded current configuration"
            );
        }
        None => tracing::warn!("No current configuration stored"),
    }

    let characters = app.assembler.list_character_names().await?;
    tracing::info!(count = characters.len(), "Known characters");

    let released = app.teardown();
    tracing::debug!(released, "Released cached media");
    store.close().await;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
