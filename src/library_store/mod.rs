//! Relational store for the synchronized music library.

mod models;
mod records;
mod schema;
mod sqlite_library_store;

pub use models::*;
pub use schema::LIBRARY_SCHEMA;
pub use sqlite_library_store::SqliteLibraryStore;

use crate::sqlite_persistence::UpsertOutcome;
use anyhow::Result;

/// Store client used by the sync drivers.
///
/// Every write is a single upsert committed on its own, errors from the
/// underlying database are returned as is.
pub trait LibraryStore: Send + Sync {
    // Reads
    fn list_artists(&self) -> Result<Vec<Artist>>;
    /// Video links of an artist, in video id order.
    fn video_ids_for_artist(&self, artist_id: &str) -> Result<Vec<VideoArtist>>;
    fn get_video(&self, video_id: &str) -> Result<Option<Video>>;
    fn get_artist(&self, artist_id: &str) -> Result<Option<Artist>>;
    fn get_lyrics_for_video(&self, video_id: &str) -> Result<Option<Lyrics>>;
    fn has_lyrics(&self, video_id: &str) -> Result<bool>;
    /// Id of the thumbnail already stored for this video and url, if any.
    fn find_thumbnail_id(&self, video_id: &str, url: &str) -> Result<Option<i64>>;
    fn get_stats(&self) -> Result<LibraryStats>;

    // Writes
    fn upsert_video(&self, video: &Video) -> Result<UpsertOutcome<String>>;
    fn upsert_artist(&self, artist: &Artist) -> Result<UpsertOutcome<String>>;
    fn upsert_album(&self, album: &Album) -> Result<UpsertOutcome<String>>;
    fn upsert_thumbnail(&self, thumbnail: &Thumbnail) -> Result<UpsertOutcome<i64>>;
    fn upsert_video_artist(&self, link: &VideoArtist) -> Result<UpsertOutcome<(String, String)>>;
    fn upsert_video_album(&self, link: &VideoAlbum) -> Result<UpsertOutcome<(String, String)>>;
    fn upsert_feedback_token(&self, token: &FeedbackToken) -> Result<UpsertOutcome<String>>;
    /// Leave `lyrics_id` empty to have the store generate it.
    fn upsert_lyrics(&self, lyrics: &Lyrics) -> Result<UpsertOutcome<String>>;
    fn upsert_video_lyrics(&self, link: &VideoLyrics) -> Result<UpsertOutcome<String>>;
}
