use super::models::{
    Album, Artist, FeedbackToken, LibraryStats, LikeStatus, Lyrics, Thumbnail, Video, VideoAlbum,
    VideoArtist, VideoLyrics,
};
use super::schema::LIBRARY_SCHEMA;
use super::LibraryStore;
use crate::sqlite_persistence::{upsert, UpsertOutcome, Upsertable, BASE_DB_VERSION};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// SQLite-backed [`LibraryStore`]. Owns the single connection of a run.
pub struct SqliteLibraryStore {
    conn: Mutex<Connection>,
}

impl SqliteLibraryStore {
    /// Opens the database at `db_path`, creating the schema when the
    /// database is empty and validating it otherwise.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open library database at {:?}", path))?;

        let store = Self::from_connection(conn)?;
        let stats = store.get_stats()?;
        info!(
            "Opened library database {:?}: {} videos, {} artists, {} lyrics",
            path, stats.videos, stats.artists, stats.lyrics
        );
        Ok(store)
    }

    /// Opens a private in-memory database with a fresh schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            info!("Creating library schema version {}", LIBRARY_SCHEMA.version);
            return LIBRARY_SCHEMA
                .create(conn)
                .context("Failed to create library schema");
        }

        let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let db_version = raw_version - BASE_DB_VERSION as i64;
        if db_version != LIBRARY_SCHEMA.version as i64 {
            bail!(
                "Library database version {} is not supported (expected {})",
                db_version,
                LIBRARY_SCHEMA.version
            );
        }
        LIBRARY_SCHEMA.validate(conn).with_context(|| {
            format!(
                "Library database schema validation failed for version {}",
                db_version
            )
        })
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    /// Dropping the store closes it as well, silently.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| anyhow::anyhow!("Library database connection mutex poisoned"))?;
        conn.close()
            .map_err(|(_, e)| e)
            .context("Failed to close library database")
    }

    fn upsert_record<T: Upsertable>(&self, record: &T) -> Result<UpsertOutcome<T::Key>> {
        let conn = self.conn.lock().unwrap();
        let outcome = upsert(&conn, record)?;
        debug!("{:?} row in {}", outcome.action, T::table().name);
        Ok(outcome)
    }

    fn count(conn: &Connection, table: &str) -> Result<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }

    fn row_to_video(row: &rusqlite::Row) -> rusqlite::Result<Video> {
        let video_id: String = row.get("video_id")?;
        let like_status_str: Option<String> = row.get("like_status")?;
        let like_status = like_status_str.and_then(|s| match s.parse::<LikeStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Video {}: {}", video_id, e);
                None
            }
        });

        Ok(Video {
            video_id,
            title: row.get("title")?,
            like_status,
            in_library: row.get("in_library")?,
            is_available: row.get("is_available")?,
            is_explicit: row.get("is_explicit")?,
            video_type: row.get("video_type")?,
            views: row.get("views")?,
            duration_seconds: row.get("duration_seconds")?,
        })
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn list_artists(&self) -> Result<Vec<Artist>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT artist_id, name FROM artists ORDER BY artist_id")?;
        let artists = stmt
            .query_map([], |row| {
                Ok(Artist {
                    artist_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(artists)
    }

    fn video_ids_for_artist(&self, artist_id: &str) -> Result<Vec<VideoArtist>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT video_id, artist_id FROM video_artists WHERE artist_id = ?1 ORDER BY video_id",
        )?;
        let links = stmt
            .query_map(params![artist_id], |row| {
                Ok(VideoArtist {
                    video_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }

    fn get_video(&self, video_id: &str) -> Result<Option<Video>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT video_id, title, like_status, in_library, is_available, is_explicit,
                    video_type, views, duration_seconds
             FROM videos WHERE video_id = ?1",
        )?;
        let video = stmt
            .query_row(params![video_id], Self::row_to_video)
            .optional()?;
        Ok(video)
    }

    fn get_artist(&self, artist_id: &str) -> Result<Option<Artist>> {
        let conn = self.conn.lock().unwrap();
        let artist = conn
            .query_row(
                "SELECT artist_id, name FROM artists WHERE artist_id = ?1",
                params![artist_id],
                |row| {
                    Ok(Artist {
                        artist_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(artist)
    }

    fn get_lyrics_for_video(&self, video_id: &str) -> Result<Option<Lyrics>> {
        let conn = self.conn.lock().unwrap();
        let lyrics = conn
            .query_row(
                "SELECT l.lyrics_id, l.lyrics FROM videos_lyrics vl
                 JOIN lyrics l ON l.lyrics_id = vl.lyrics_id
                 WHERE vl.video_id = ?1",
                params![video_id],
                |row| {
                    Ok(Lyrics {
                        lyrics_id: Some(row.get(0)?),
                        text: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(lyrics)
    }

    fn has_lyrics(&self, video_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let found = conn
            .query_row(
                "SELECT 1 FROM videos_lyrics WHERE video_id = ?1",
                params![video_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(found)
    }

    fn find_thumbnail_id(&self, video_id: &str, url: &str) -> Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                "SELECT thumbnail_id FROM thumbnails WHERE video_id = ?1 AND url = ?2
                 ORDER BY thumbnail_id LIMIT 1",
                params![video_id, url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn get_stats(&self) -> Result<LibraryStats> {
        let conn = self.conn.lock().unwrap();
        Ok(LibraryStats {
            videos: Self::count(&conn, "videos")?,
            artists: Self::count(&conn, "artists")?,
            albums: Self::count(&conn, "albums")?,
            thumbnails: Self::count(&conn, "thumbnails")?,
            feedback_tokens: Self::count(&conn, "feedback_tokens")?,
            lyrics: Self::count(&conn, "lyrics")?,
            videos_with_lyrics: Self::count(&conn, "videos_lyrics")?,
        })
    }

    fn upsert_video(&self, video: &Video) -> Result<UpsertOutcome<String>> {
        self.upsert_record(video)
    }

    fn upsert_artist(&self, artist: &Artist) -> Result<UpsertOutcome<String>> {
        self.upsert_record(artist)
    }

    fn upsert_album(&self, album: &Album) -> Result<UpsertOutcome<String>> {
        self.upsert_record(album)
    }

    fn upsert_thumbnail(&self, thumbnail: &Thumbnail) -> Result<UpsertOutcome<i64>> {
        self.upsert_record(thumbnail)
    }

    fn upsert_video_artist(&self, link: &VideoArtist) -> Result<UpsertOutcome<(String, String)>> {
        self.upsert_record(link)
    }

    fn upsert_video_album(&self, link: &VideoAlbum) -> Result<UpsertOutcome<(String, String)>> {
        self.upsert_record(link)
    }

    fn upsert_feedback_token(&self, token: &FeedbackToken) -> Result<UpsertOutcome<String>> {
        self.upsert_record(token)
    }

    fn upsert_lyrics(&self, lyrics: &Lyrics) -> Result<UpsertOutcome<String>> {
        self.upsert_record(lyrics)
    }

    fn upsert_video_lyrics(&self, link: &VideoLyrics) -> Result<UpsertOutcome<String>> {
        self.upsert_record(link)
    }
}
