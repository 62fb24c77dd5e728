//! Drivers that fill the library store from external sources.

pub mod library_import;
pub mod lyrics_sync;

pub use library_import::{import_library_file, import_songs, ImportReport, LibrarySong};
pub use lyrics_sync::{sync_lyrics, LyricsSyncReport};
