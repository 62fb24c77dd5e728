//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestLibrary, ScriptedProvider, ARTIST_1_ID};
//!
//! #[test]
//! fn test_sync() {
//!     let library = TestLibrary::seeded();
//!     let provider = ScriptedProvider::default();
//!     livingroom_sync::sync_lyrics(&library.store, &provider).unwrap();
//! }
//! ```

mod constants;
mod fixtures;
mod provider;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::TestLibrary;
pub use provider::ScriptedProvider;
