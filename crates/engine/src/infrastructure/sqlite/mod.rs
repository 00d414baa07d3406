//! Embedded SQLite store.

mod repos;
mod store;
mod tables;

pub use repos::{
    SqliteCharacterRepo, SqliteConfigurationRepo, SqliteMediaAssetRepo, SqliteRepositories,
};
pub use store::{Filter, SqlValue, SqliteQuery, SqliteStore, Table, SCHEMA_VERSION};
