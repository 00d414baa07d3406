//! Create many characters at once from a JSON file.
//!
//! ```json
//! [
//!   { "name": "Goblin", "avatarPath": "/sdcard/goblin.png", "audioPaths": ["/sdcard/cackle.ogg"] }
//! ]
//! ```
//!
//! Each entry goes through the same resolve and persist path as a character
//! added by hand. Names already present (in the database or earlier in the
//! same file) are skipped.

use std::collections::HashSet;

use initrack_domain::{CharacterAggregate, MediaAssetType, MediaPath};
use serde::Deserialize;

use super::assembler::{AssemblyError, Assembler};
use crate::infrastructure::ports::MediaError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub name: String,
    pub avatar_path: String,
    #[serde(default)]
    pub audio_paths: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    /// `(name, reason)`
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("Import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not read import file: {0}")]
    Read(#[from] MediaError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

pub fn parse_entries(payload: &str) -> Result<Vec<ImportEntry>, BatchImportError> {
    Ok(serde_json::from_str(payload)?)
}

/// Run an import over `payload`.
///
/// A failing entry is recorded in the report and the import moves on; only an
/// unparseable payload or a database failure during the duplicate check
/// aborts the whole run.
pub async fn import_characters(
    assembler: &mut Assembler,
    payload: &str,
) -> Result<ImportReport, BatchImportError> {
    let entries = parse_entries(payload)?;
    let mut report = ImportReport::default();
    let mut seen = HashSet::new();

    for entry in entries {
        let name = entry.name.trim().to_string();
        if !seen.insert(name.clone()) || assembler.character_exists(&name).await? {
            tracing::debug!(name = %name, "Character already exists, skipping import entry");
            report.skipped.push(name);
            continue;
        }

        let mut aggregate = build_aggregate(assembler, &name, &entry).await;
        match assembler.create_character(&mut aggregate).await {
            Ok(_) => report.created.push(name),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Failed to import character");
                report.failed.push((name, e.to_string()));
            }
        }
    }

    tracing::info!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Batch import finished"
    );
    Ok(report)
}

/// Let the user pick a `.json` file and import it. `None` on cancel.
pub async fn import_from_picker(
    assembler: &mut Assembler,
) -> Result<Option<ImportReport>, BatchImportError> {
    let picker = assembler.resolver().picker().clone();
    let Some(path) = picker.pick_file("json").await else {
        return Ok(None);
    };
    let payload = picker.read_text(&path).await?;
    Ok(Some(import_characters(assembler, &payload).await?))
}

async fn build_aggregate(
    assembler: &mut Assembler,
    name: &str,
    entry: &ImportEntry,
) -> CharacterAggregate {
    let resolver = assembler.resolver_mut();

    let avatar = resolver.transient_record(MediaAssetType::Avatar, MediaPath::new(&entry.avatar_path));
    let created_at = avatar.created_at();
    let avatar = resolver.resolve(avatar).await;

    let mut audio_clips = Vec::with_capacity(entry.audio_paths.len());
    for path in &entry.audio_paths {
        let record = resolver.transient_record(MediaAssetType::Audio, MediaPath::new(path));
        audio_clips.push(resolver.resolve(record).await);
    }

    CharacterAggregate::new(name, avatar, audio_clips, created_at)
}
