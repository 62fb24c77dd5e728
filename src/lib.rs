//! Livingroom Sync Library
//!
//! Keeps a relational copy of a music-streaming library and enriches its
//! videos with lyrics. Exposed as a library for the CLI and for tests.

pub mod config;
pub mod library_store;
pub mod lyrics;
pub mod sqlite_persistence;
pub mod sync;

// Re-export commonly used types for convenience
pub use library_store::{LibraryStore, SqliteLibraryStore};
pub use lyrics::{GeniusClient, LyricsError, LyricsProvider};
pub use sqlite_persistence::{upsert, UpsertAction, UpsertOutcome, Upsertable};
pub use sync::{import_library_file, sync_lyrics, ImportReport, LyricsSyncReport};
