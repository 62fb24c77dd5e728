#![allow(dead_code)]

use livingroom_sync::lyrics::{LyricsError, LyricsProvider};
use std::collections::HashMap;
use std::sync::Mutex;

enum Script {
    Lyrics(String),
    Fail,
}

/// Lyrics provider answering from a script keyed by (title, artist).
/// Unscripted songs are not found. Every lookup is recorded.
#[derive(Default)]
pub struct ScriptedProvider {
    script: HashMap<(String, String), Script>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn with_lyrics(mut self, title: &str, artist: &str, lyrics: &str) -> Self {
        self.script.insert(
            (title.to_string(), artist.to_string()),
            Script::Lyrics(lyrics.to_string()),
        );
        self
    }

    pub fn failing_on(mut self, title: &str, artist: &str) -> Self {
        self.script
            .insert((title.to_string(), artist.to_string()), Script::Fail);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LyricsProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn find_lyrics(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError> {
        let key = (title.to_string(), artist.to_string());
        self.calls.lock().unwrap().push(key.clone());
        match self.script.get(&key) {
            Some(Script::Lyrics(text)) => Ok(Some(text.clone())),
            Some(Script::Fail) => Err(LyricsError::Connection("connection reset".to_string())),
            None => Ok(None),
        }
    }
}
