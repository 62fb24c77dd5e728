//! Binds the library models to their tables for [`upsert`].
//!
//! [`upsert`]: crate::sqlite_persistence::upsert

use super::models::{
    Album, Artist, FeedbackToken, Lyrics, Thumbnail, Video, VideoAlbum, VideoArtist, VideoLyrics,
};
use super::schema::{
    ALBUMS_TABLE, ARTISTS_TABLE, FEEDBACK_TOKENS_TABLE, LYRICS_TABLE, THUMBNAILS_TABLE,
    VIDEOS_LYRICS_TABLE, VIDEOS_TABLE, VIDEO_ALBUMS_TABLE, VIDEO_ARTISTS_TABLE,
};
use crate::sqlite_persistence::{Table, Upsertable};
use rusqlite::types::Value;
use rusqlite::Row;

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn opt_text(s: &Option<String>) -> Value {
    s.as_ref().map_or(Value::Null, |s| Value::Text(s.clone()))
}

fn opt_integer(i: Option<i64>) -> Value {
    i.map_or(Value::Null, Value::Integer)
}

fn flag(b: bool) -> Value {
    Value::Integer(b as i64)
}

impl Upsertable for Video {
    type Key = String;

    fn table() -> &'static Table {
        &VIDEOS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("video_id", text(&self.video_id)),
            ("title", text(&self.title)),
            (
                "like_status",
                self.like_status.map_or(Value::Null, |s| text(s.as_str())),
            ),
            ("in_library", flag(self.in_library)),
            ("is_available", flag(self.is_available)),
            ("is_explicit", flag(self.is_explicit)),
            ("video_type", opt_text(&self.video_type)),
            ("views", opt_text(&self.views)),
            ("duration_seconds", opt_integer(self.duration_seconds)),
        ]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}

impl Upsertable for Artist {
    type Key = String;

    fn table() -> &'static Table {
        &ARTISTS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![("artist_id", text(&self.artist_id)), ("name", text(&self.name))]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}

impl Upsertable for Album {
    type Key = String;

    fn table() -> &'static Table {
        &ALBUMS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![("album_id", text(&self.album_id)), ("name", text(&self.name))]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}

impl Upsertable for Thumbnail {
    type Key = i64;

    fn table() -> &'static Table {
        &THUMBNAILS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::with_capacity(5);
        if let Some(id) = self.thumbnail_id {
            values.push(("thumbnail_id", Value::Integer(id)));
        }
        values.push(("url", text(&self.url)));
        values.push(("width", opt_integer(self.width)));
        values.push(("height", opt_integer(self.height)));
        values.push(("video_id", text(&self.video_id)));
        values
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<i64> {
        row.get(0)
    }
}

impl Upsertable for VideoArtist {
    type Key = (String, String);

    fn table() -> &'static Table {
        &VIDEO_ARTISTS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("video_id", text(&self.video_id)),
            ("artist_id", text(&self.artist_id)),
        ]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }
}

impl Upsertable for VideoAlbum {
    type Key = (String, String);

    fn table() -> &'static Table {
        &VIDEO_ALBUMS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("video_id", text(&self.video_id)),
            ("album_id", text(&self.album_id)),
        ]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }
}

impl Upsertable for FeedbackToken {
    type Key = String;

    fn table() -> &'static Table {
        &FEEDBACK_TOKENS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("video_id", text(&self.video_id)),
            ("add_token", opt_text(&self.add_token)),
            ("remove_token", opt_text(&self.remove_token)),
        ]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}

impl Upsertable for Lyrics {
    type Key = String;

    fn table() -> &'static Table {
        &LYRICS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::with_capacity(2);
        if let Some(id) = &self.lyrics_id {
            values.push(("lyrics_id", text(id)));
        }
        values.push(("lyrics", text(&self.text)));
        values
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}

impl Upsertable for VideoLyrics {
    type Key = String;

    fn table() -> &'static Table {
        &VIDEOS_LYRICS_TABLE
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("video_id", text(&self.video_id)),
            ("lyrics_id", text(&self.lyrics_id)),
        ]
    }

    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
        row.get(0)
    }
}
