//! End-to-end tests over the full application stack.
//!
//! These tests build a complete `App` with:
//! - Real SQLite repositories (in-memory database)
//! - The filesystem media adapter over a temporary directory
//! - A scripted picker and a counting decoder wrapped around it
//!
//! # Running E2E Tests
//!
//! ```bash
//! cargo test -p initrack-engine --lib e2e_tests
//! ```

mod e2e_helpers;

pub use e2e_helpers::*;
