//! Import of a streaming library export into the store.
//!
//! The export is a JSON array of songs as the streaming service lists them
//! (camelCase keys, optional fields often `null`). Rows are written parents
//! first so every link finds its video, artist and album already stored.

use crate::library_store::{
    Album, Artist, FeedbackToken, LibraryStore, LikeStatus, Thumbnail, Video, VideoAlbum,
    VideoArtist,
};
use crate::sqlite_persistence::{UpsertAction, UpsertOutcome};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySong {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub artists: Option<Vec<LibraryRef>>,
    #[serde(default)]
    pub album: Option<LibraryRef>,
    #[serde(default)]
    pub like_status: Option<LikeStatus>,
    #[serde(default = "default_true")]
    pub in_library: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub video_type: Option<String>,
    #[serde(default)]
    pub views: Option<String>,
    /// Display duration, e.g. "3:35".
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, rename = "duration_seconds")]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub thumbnails: Option<Vec<LibraryThumbnail>>,
    #[serde(default)]
    pub feedback_tokens: Option<LibraryFeedbackTokens>,
}

/// Artist or album reference inside a song. The id is missing for entries
/// the service cannot browse to.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRef {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryThumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryFeedbackTokens {
    #[serde(default)]
    pub add: Option<String>,
    #[serde(default)]
    pub remove: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Counters of a library import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub songs: usize,
    pub artists: usize,
    pub albums: usize,
    pub thumbnails: usize,
    pub feedback_tokens: usize,
    /// Rows created, over all tables.
    pub inserted: usize,
    /// Rows that already existed and were rewritten, over all tables.
    pub updated: usize,
}

impl ImportReport {
    fn record<K>(&mut self, outcome: &UpsertOutcome<K>) {
        match outcome.action {
            UpsertAction::Inserted => self.inserted += 1,
            UpsertAction::Updated => self.updated += 1,
        }
    }
}

/// Parses "m:ss" or "h:mm:ss" into seconds. Minutes and seconds after the
/// leading part must be below 60.
fn parse_duration(duration: &str) -> Option<i64> {
    let parts: Vec<&str> = duration.trim().split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut seconds: i64 = 0;
    for (position, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: i64 = part.parse().ok()?;
        if position > 0 && value >= 60 {
            return None;
        }
        seconds = seconds.checked_mul(60)?.checked_add(value)?;
    }
    Some(seconds)
}

impl LibrarySong {
    fn to_video(&self) -> Video {
        Video {
            video_id: self.video_id.clone(),
            title: self.title.clone(),
            like_status: self.like_status,
            in_library: self.in_library,
            is_available: self.is_available,
            is_explicit: self.is_explicit,
            video_type: self.video_type.clone(),
            views: self.views.clone(),
            duration_seconds: self
                .duration_seconds
                .or_else(|| self.duration.as_deref().and_then(parse_duration)),
        }
    }
}

/// Reads a library export file. Nothing is written when the file is malformed.
pub fn load_library_export(path: &Path) -> Result<Vec<LibrarySong>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library export {:?}", path))?;
    let songs: Vec<LibrarySong> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse library export {:?}", path))?;
    Ok(songs)
}

fn import_song(
    store: &dyn LibraryStore,
    song: &LibrarySong,
    report: &mut ImportReport,
) -> Result<()> {
    report.record(&store.upsert_video(&song.to_video())?);

    for artist in song.artists.iter().flatten() {
        let Some(artist_id) = &artist.id else {
            debug!(
                "Skipping artist '{}' without id on {}",
                artist.name, song.video_id
            );
            continue;
        };
        report.record(&store.upsert_artist(&Artist {
            artist_id: artist_id.clone(),
            name: artist.name.clone(),
        })?);
        report.record(&store.upsert_video_artist(&VideoArtist {
            video_id: song.video_id.clone(),
            artist_id: artist_id.clone(),
        })?);
        report.artists += 1;
    }

    if let Some(album) = &song.album {
        if let Some(album_id) = &album.id {
            report.record(&store.upsert_album(&Album {
                album_id: album_id.clone(),
                name: album.name.clone(),
            })?);
            report.record(&store.upsert_video_album(&VideoAlbum {
                video_id: song.video_id.clone(),
                album_id: album_id.clone(),
            })?);
            report.albums += 1;
        }
    }

    for thumbnail in song.thumbnails.iter().flatten() {
        let thumbnail_id = store.find_thumbnail_id(&song.video_id, &thumbnail.url)?;
        report.record(&store.upsert_thumbnail(&Thumbnail {
            thumbnail_id,
            url: thumbnail.url.clone(),
            width: thumbnail.width,
            height: thumbnail.height,
            video_id: song.video_id.clone(),
        })?);
        report.thumbnails += 1;
    }

    if let Some(tokens) = &song.feedback_tokens {
        report.record(&store.upsert_feedback_token(&FeedbackToken {
            video_id: song.video_id.clone(),
            add_token: tokens.add.clone(),
            remove_token: tokens.remove.clone(),
        })?);
        report.feedback_tokens += 1;
    }

    report.songs += 1;
    Ok(())
}

pub fn import_songs(store: &dyn LibraryStore, songs: &[LibrarySong]) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    for song in songs {
        import_song(store, song, &mut report)
            .with_context(|| format!("Failed to import song {}", song.video_id))?;
    }
    info!(
        "Imported {} songs ({} artist links, {} album links, {} thumbnails, {} feedback tokens): {} rows inserted, {} updated",
        report.songs,
        report.artists,
        report.albums,
        report.thumbnails,
        report.feedback_tokens,
        report.inserted,
        report.updated
    );
    Ok(report)
}

pub fn import_library_file(store: &dyn LibraryStore, path: &Path) -> Result<ImportReport> {
    let songs = load_library_export(path)?;
    info!("Loaded {} songs from {:?}", songs.len(), path);
    import_songs(store, &songs)
}
