//! Data models for the library database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rating the user gave to a video in the streaming library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LikeStatus {
    Like,
    Dislike,
    Indifferent,
}

impl LikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeStatus::Like => "LIKE",
            LikeStatus::Dislike => "DISLIKE",
            LikeStatus::Indifferent => "INDIFFERENT",
        }
    }
}

impl fmt::Display for LikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LikeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(LikeStatus::Like),
            "DISLIKE" => Ok(LikeStatus::Dislike),
            "INDIFFERENT" => Ok(LikeStatus::Indifferent),
            other => Err(format!("Unknown like status: {}", other)),
        }
    }
}

/// A song or music video of the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub like_status: Option<LikeStatus>,
    pub in_library: bool,
    pub is_available: bool,
    pub is_explicit: bool,
    pub video_type: Option<String>, // e.g. "MUSIC_VIDEO_TYPE_ATV"
    pub views: Option<String>,      // as displayed, e.g. "1.2M"
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub album_id: String,
    pub name: String,
}

/// Cover image of a video. `thumbnail_id` is numbered by the store, leave it
/// empty to insert a new thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub thumbnail_id: Option<i64>,
    pub url: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoArtist {
    pub video_id: String,
    pub artist_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAlbum {
    pub video_id: String,
    pub album_id: String,
}

/// Opaque tokens the streaming platform uses to add/remove a video from the
/// library. Stored as delivered, never used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackToken {
    pub video_id: String,
    pub add_token: Option<String>,
    pub remove_token: Option<String>,
}

/// Full lyrics text. `lyrics_id` is generated by the store when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub lyrics_id: Option<String>,
    pub text: String,
}

/// Association of a video with its lyrics, at most one per video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLyrics {
    pub video_id: String,
    pub lyrics_id: String,
}

/// Row counts of the library database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub videos: usize,
    pub artists: usize,
    pub albums: usize,
    pub thumbnails: usize,
    pub feedback_tokens: usize,
    pub lyrics: usize,
    pub videos_with_lyrics: usize,
}
