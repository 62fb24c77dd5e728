//! Lyrics enrichment of the library.
//!
//! Walks artists, their linked videos, and fetches lyrics for every video
//! that has none yet:
//!
//! ```text
//! Artist → VideoArtist → Video → (no VideoLyrics?) → provider → Lyrics + VideoLyrics
//! ```
//!
//! Provider failures only skip the video at hand. Store failures end the run,
//! what was written before stays since every upsert commits on its own.
//! Videos without any artist link are never visited.

use crate::library_store::{LibraryStore, Lyrics, VideoLyrics};
use crate::lyrics::LyricsProvider;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Counters of a lyrics sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsSyncReport {
    pub artists_visited: usize,
    pub videos_visited: usize,
    pub fetched: usize,
    pub already_present: usize,
    pub not_found: usize,
    pub failed: usize,
}

pub fn sync_lyrics(
    store: &dyn LibraryStore,
    provider: &dyn LyricsProvider,
) -> Result<LyricsSyncReport> {
    let mut report = LyricsSyncReport::default();
    let artists = store.list_artists()?;
    info!(
        "Syncing lyrics for {} artists using {}",
        artists.len(),
        provider.name()
    );

    for artist in &artists {
        report.artists_visited += 1;
        for link in store.video_ids_for_artist(&artist.artist_id)? {
            let Some(video) = store.get_video(&link.video_id)? else {
                continue;
            };
            report.videos_visited += 1;

            if store.has_lyrics(&video.video_id)? {
                debug!("Lyrics already present for {}", video.video_id);
                report.already_present += 1;
                continue;
            }

            let text = match provider.find_lyrics(&video.title, &artist.name) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    warn!(
                        "No lyrics found for '{}' by '{}' ({})",
                        video.title, artist.name, video.video_id
                    );
                    report.not_found += 1;
                    continue;
                }
                Err(e) => {
                    warn!(
                        "Lyrics lookup failed for '{}' by '{}' ({}): {}",
                        video.title, artist.name, video.video_id, e
                    );
                    report.failed += 1;
                    continue;
                }
            };

            let lyrics = store.upsert_lyrics(&Lyrics {
                lyrics_id: None,
                text,
            })?;
            store.upsert_video_lyrics(&VideoLyrics {
                video_id: video.video_id.clone(),
                lyrics_id: lyrics.key.clone(),
            })?;
            debug!(
                "Stored lyrics {} for '{}' ({})",
                lyrics.key, video.title, video.video_id
            );
            report.fetched += 1;
        }
    }

    info!(
        "Lyrics sync done: {} videos visited, {} fetched, {} already present, {} not found, {} failed",
        report.videos_visited,
        report.fetched,
        report.already_present,
        report.not_found,
        report.failed
    );
    Ok(report)
}
