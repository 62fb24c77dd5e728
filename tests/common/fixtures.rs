#![allow(dead_code)]

use super::constants::*;
use livingroom_sync::library_store::{
    Artist, LibraryStore, LikeStatus, SqliteLibraryStore, Video, VideoArtist,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// An on-disk library database living as long as the fixture.
pub struct TestLibrary {
    pub store: SqliteLibraryStore,
    pub db_path: PathBuf,
    _temp_dir: TempDir, // Keep temp dir alive
}

impl TestLibrary {
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("library.db");
        let store = SqliteLibraryStore::open(&db_path).unwrap();
        Self {
            store,
            db_path,
            _temp_dir: temp_dir,
        }
    }

    /// Two artists with three linked videos, plus one video no artist
    /// links to.
    pub fn seeded() -> Self {
        let library = Self::empty();
        library.add_artist(ARTIST_1_ID, ARTIST_1_NAME);
        library.add_artist(ARTIST_2_ID, ARTIST_2_NAME);
        library.add_video(VIDEO_1_ID, VIDEO_1_TITLE);
        library.add_video(VIDEO_2_ID, VIDEO_2_TITLE);
        library.add_video(VIDEO_3_ID, VIDEO_3_TITLE);
        library.add_video(ORPHAN_VIDEO_ID, ORPHAN_VIDEO_TITLE);
        library.link(VIDEO_1_ID, ARTIST_1_ID);
        library.link(VIDEO_3_ID, ARTIST_1_ID);
        library.link(VIDEO_2_ID, ARTIST_2_ID);
        library
    }

    /// Closes and reopens the database file, as a second run would.
    pub fn reopen(self) -> Self {
        let TestLibrary {
            store,
            db_path,
            _temp_dir,
        } = self;
        store.close().unwrap();
        let store = SqliteLibraryStore::open(&db_path).unwrap();
        Self {
            store,
            db_path,
            _temp_dir,
        }
    }

    pub fn add_artist(&self, id: &str, name: &str) {
        self.store
            .upsert_artist(&Artist {
                artist_id: id.to_string(),
                name: name.to_string(),
            })
            .unwrap();
    }

    pub fn add_video(&self, id: &str, title: &str) {
        self.store
            .upsert_video(&Video {
                video_id: id.to_string(),
                title: title.to_string(),
                like_status: Some(LikeStatus::Like),
                in_library: true,
                is_available: true,
                is_explicit: false,
                video_type: Some("MUSIC_VIDEO_TYPE_ATV".to_string()),
                views: None,
                duration_seconds: Some(180),
            })
            .unwrap();
    }

    pub fn link(&self, video_id: &str, artist_id: &str) {
        self.store
            .upsert_video_artist(&VideoArtist {
                video_id: video_id.to_string(),
                artist_id: artist_id.to_string(),
            })
            .unwrap();
    }
}
