use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::parser::{is_song_link, is_verse_block, PageDocument};
use crate::{CrawlerError, Result};

/// Body value for songs whose page states the lyrics cannot be shown for
/// licensing reasons. Detected downstream by exact string comparison, so it
/// must be stored verbatim.
pub const MISSING_LYRICS: &str = "Unfortunately, we are not authorized to show these lyrics.";

/// A song-page link discovered on a chart index, tagged with the genre of
/// the index it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongLink {
    pub url: Url,
    pub genre: String,
}

/// Title and lyric body taken from one song page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLyric {
    pub title: String,
    pub body: String,
}

impl ExtractedLyric {
    pub fn is_missing(&self) -> bool {
        self.body == MISSING_LYRICS
    }
}

/// The unit handed to the downstream analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricRecord {
    pub title: String,
    pub url: Url,
    pub genre: String,
    pub body: String,
}

/// Genre tag of a chart index URL: the token after the first hyphen in the
/// basename stem. The unqualified `top100.html` index has no hyphen and
/// tags its links with the empty string.
pub fn genre_of(index_url: &Url) -> String {
    let key = storage::resource_key(index_url);
    let stem = key.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&key);
    stem.split_once('-')
        .map(|(_, genre)| genre.to_string())
        .unwrap_or_default()
}

/// Pulls song-page links out of a chart index page.
#[derive(Debug, Default)]
pub struct IndexExtractor;

impl IndexExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Links in document order, duplicates kept, each tagged with the genre
    /// of `index_url`.
    pub fn extract(&self, bytes: &[u8], index_url: &Url) -> Vec<SongLink> {
        let genre = genre_of(index_url);
        let page = PageDocument::parse(bytes, index_url.clone());

        let links: Vec<SongLink> = page
            .links_where(is_song_link)
            .into_iter()
            .map(|url| SongLink {
                url,
                genre: genre.clone(),
            })
            .collect();

        debug!("extracted {} song links from {}", links.len(), index_url);
        links
    }
}

/// Pulls the title and lyric body out of a song page.
#[derive(Debug, Default)]
pub struct LyricExtractor;

impl LyricExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Title comes from the first heading, with the trailing word "Lyrics"
    /// stripped. The body is the text of every verse block in document
    /// order, run together with no separator. A page carrying the
    /// missing-lyrics notice yields `MISSING_LYRICS` as the body.
    pub fn extract(&self, bytes: &[u8], url: &Url) -> Result<ExtractedLyric> {
        let page = PageDocument::parse(bytes, url.clone());

        let heading = page.first_heading().ok_or_else(|| CrawlerError::MalformedPage {
            url: url.clone(),
            reason: "no heading element".to_string(),
        })?;
        let title = heading.trim();
        let title = title.strip_suffix("Lyrics").unwrap_or(title).trim().to_string();

        let mut body = String::new();
        for verse in page.elements_where(is_verse_block) {
            for chunk in verse.text() {
                body.push_str(chunk);
            }
        }

        if page.normalized_text().contains(MISSING_LYRICS) {
            debug!("lyrics not licensed for display at {}", url);
            body = MISSING_LYRICS.to_string();
        }

        Ok(ExtractedLyric { title, body })
    }
}
