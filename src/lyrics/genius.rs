//! Genius API client.
//!
//! The API only exposes song metadata, the lyrics themselves are scraped from
//! the song page referenced by the search hit.

use super::{LyricsError, LyricsProvider};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const GENIUS_API_BASE: &str = "https://api.genius.com";
const USER_AGENT: &str = concat!("livingroom-sync/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref LYRICS_CONTAINER_RE: Regex =
        Regex::new(r#"(?i)<div\b[^>]*\bdata-lyrics-container="true"[^>]*>"#).unwrap();
    static ref EXCLUDED_BLOCK_RE: Regex =
        Regex::new(r#"(?i)<div\b[^>]*\bdata-exclude-from-selection="true"[^>]*>"#).unwrap();
    static ref DIV_TAG_RE: Regex = Regex::new(r"(?i)</?div\b[^>]*>").unwrap();
    static ref BR_RE: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref ENTITY_RE: Regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap();
}

#[derive(Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    hit_type: String,
    result: SongResult,
}

#[derive(Deserialize)]
struct SongResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    primary_artist: Option<PrimaryArtist>,
}

#[derive(Deserialize)]
struct PrimaryArtist {
    name: String,
}

pub struct GeniusClient {
    client: Client,
    api_base: String,
    access_token: String,
}

impl GeniusClient {
    pub fn new(access_token: &str) -> Result<Self, LyricsError> {
        Self::with_api_base(access_token, GENIUS_API_BASE)
    }

    pub fn with_api_base(access_token: &str, api_base: &str) -> Result<Self, LyricsError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn search(&self, title: &str, artist: &str) -> Result<Vec<SearchHit>, LyricsError> {
        let url = format!(
            "{}/search?q={}",
            self.api_base,
            urlencoding::encode(&format!("{} {}", title, artist))
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(LyricsError::Unauthorized);
        }
        if !status.is_success() {
            return Err(LyricsError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let body: SearchResponse = response.json()?;
        Ok(body.response.hits)
    }

    fn fetch_page(&self, url: &str) -> Result<String, LyricsError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LyricsError::Api {
                status: status.as_u16(),
                message: format!("Failed to fetch song page {}", url),
            });
        }
        Ok(response.text()?)
    }
}

impl LyricsProvider for GeniusClient {
    fn name(&self) -> &'static str {
        "genius"
    }

    fn find_lyrics(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError> {
        let hits = self.search(title, artist)?;
        let Some(song) = select_song(&hits, artist) else {
            debug!("No Genius hit for '{}' by '{}'", title, artist);
            return Ok(None);
        };
        let Some(page_url) = &song.url else {
            return Ok(None);
        };
        debug!(
            "Genius hit for '{}' by '{}': '{}' at {}",
            title,
            artist,
            song.title.as_deref().unwrap_or_default(),
            page_url
        );

        let html = self.fetch_page(page_url)?;
        Ok(extract_lyrics(&html))
    }
}

/// Lowercased alphanumerics only, so "AC/DC" and "ac dc" compare equal.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn artist_matches(candidate: &str, wanted: &str) -> bool {
    let candidate = normalize_name(candidate);
    let wanted = normalize_name(wanted);
    if candidate.is_empty() || wanted.is_empty() {
        return false;
    }
    candidate.contains(&wanted) || wanted.contains(&candidate)
}

/// First song hit whose primary artist matches the requested artist.
fn select_song<'a>(hits: &'a [SearchHit], artist: &str) -> Option<&'a SongResult> {
    hits.iter()
        .filter(|hit| hit.hit_type == "song")
        .map(|hit| &hit.result)
        .find(|song| {
            song.primary_artist
                .as_ref()
                .is_some_and(|a| artist_matches(&a.name, artist))
        })
}

/// Byte range of the content of the div opened right before `body_start`,
/// up to its matching closing tag or the end of the document.
fn div_body_end(html: &str, body_start: usize) -> (usize, usize) {
    let mut depth = 1;
    for tag in DIV_TAG_RE.find_iter(&html[body_start..]) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return (body_start + tag.start(), body_start + tag.end());
            }
        } else {
            depth += 1;
        }
    }
    (html.len(), html.len())
}

fn remove_excluded_blocks(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut cursor = 0;
    while let Some(open) = EXCLUDED_BLOCK_RE.find_at(fragment, cursor) {
        out.push_str(&fragment[cursor..open.start()]);
        let (_, after_close) = div_body_end(fragment, open.end());
        cursor = after_close;
    }
    out.push_str(&fragment[cursor..]);
    out
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn container_text(fragment: &str) -> String {
    let fragment = remove_excluded_blocks(fragment);
    let with_breaks = BR_RE.replace_all(&fragment, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

/// Extracts the lyrics text from a Genius song page.
///
/// Every `data-lyrics-container` div contributes its text, line breaks kept.
/// Returns `None` when the page has no non-blank lyrics.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let mut parts = Vec::new();
    let mut cursor = 0;
    while let Some(open) = LYRICS_CONTAINER_RE.find_at(html, cursor) {
        let (body_end, after_close) = div_body_end(html, open.end());
        let text = container_text(&html[open.end()..body_end]);
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        cursor = after_close;
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
