//! Initrack Engine library.
//!
//! Storage and media plumbing for the initiative tracker.
//!
//! ## Structure
//!
//! - `infrastructure/` - Ports plus the SQLite store, media cache and local media adapter
//! - `use_cases/` - Media resolution, aggregate assembly, seeding, batch import
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end tests over an in-memory database.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
