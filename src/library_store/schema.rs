//! SQLite schema definitions for the library database.
//!
//! Entity tables are keyed by the streaming platform's opaque string ids,
//! thumbnails by an integer rowid and lyrics by a store-generated hex id.
//! Link tables carry composite primary keys.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, GENERATED_HEX_ID,
};

// =============================================================================
// Entity Tables
// =============================================================================

pub(super) const VIDEOS_TABLE: Table = Table {
    name: "videos",
    columns: &[
        sqlite_column!("video_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("like_status", &SqlType::Text), // LIKE, DISLIKE, INDIFFERENT
        sqlite_column!("in_library", &SqlType::Integer, non_null = true),
        sqlite_column!("is_available", &SqlType::Integer, non_null = true),
        sqlite_column!("is_explicit", &SqlType::Integer, non_null = true),
        sqlite_column!("video_type", &SqlType::Text),
        sqlite_column!("views", &SqlType::Text),
        sqlite_column!("duration_seconds", &SqlType::Integer),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub(super) const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub(super) const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("album_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub(super) const THUMBNAILS_TABLE: Table = Table {
    name: "thumbnails",
    columns: &[
        sqlite_column!("thumbnail_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("url", &SqlType::Text, non_null = true),
        sqlite_column!("width", &SqlType::Integer),
        sqlite_column!("height", &SqlType::Integer),
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "videos",
                foreign_column: "video_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_thumbnails_video", "video_id")],
    unique_constraints: &[&["video_id", "url"]],
};

pub(super) const FEEDBACK_TOKENS_TABLE: Table = Table {
    name: "feedback_tokens",
    columns: &[
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            is_primary_key = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "videos",
                foreign_column: "video_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("add_token", &SqlType::Text),
        sqlite_column!("remove_token", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub(super) const LYRICS_TABLE: Table = Table {
    name: "lyrics",
    columns: &[
        sqlite_column!(
            "lyrics_id",
            &SqlType::Text,
            is_primary_key = true,
            default_value = Some(GENERATED_HEX_ID)
        ),
        sqlite_column!("lyrics", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

// =============================================================================
// Link Tables
// =============================================================================

pub(super) const VIDEO_ARTISTS_TABLE: Table = Table {
    name: "video_artists",
    columns: &[
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "videos",
                foreign_column: "video_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "artists",
                foreign_column: "artist_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_video_artists_artist", "artist_id")],
    unique_constraints: &[],
};

pub(super) const VIDEO_ALBUMS_TABLE: Table = Table {
    name: "video_albums",
    columns: &[
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "videos",
                foreign_column: "video_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "albums",
                foreign_column: "album_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_video_albums_album", "album_id")],
    unique_constraints: &[],
};

/// One lyrics association per video: keyed by video_id alone.
pub(super) const VIDEOS_LYRICS_TABLE: Table = Table {
    name: "videos_lyrics",
    columns: &[
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            is_primary_key = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "videos",
                foreign_column: "video_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "lyrics_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "lyrics",
                foreign_column: "lyrics_id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
    ],
    indices: &[("idx_videos_lyrics_lyrics", "lyrics_id")],
    unique_constraints: &[],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

/// Parents come before the tables referencing them.
pub const LIBRARY_SCHEMA: VersionedSchema = VersionedSchema {
    version: 0,
    tables: &[
        VIDEOS_TABLE,
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        THUMBNAILS_TABLE,
        VIDEO_ARTISTS_TABLE,
        VIDEO_ALBUMS_TABLE,
        FEEDBACK_TOKENS_TABLE,
        LYRICS_TABLE,
        VIDEOS_LYRICS_TABLE,
    ],
};
