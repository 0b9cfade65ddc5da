pub mod catalog;
pub mod spotify;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{CatalogAdapter, Fetch, Suggestion, SuggestionKind};
pub use spotify::SpotifyClient;

pub const UNKNOWN_TITLE: &str = "unknown title";
pub const UNKNOWN_ARTIST: &str = "unknown artist";
pub const UNKNOWN_ALBUM: &str = "unknown album";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Query shapes understood by the catalog search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Track,
    Artist,
    Album,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
            SearchKind::Artist => "artist",
            SearchKind::Album => "album",
        }
    }
}

/// Failure of a single call to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("malformed payload: {0}")]
    Decode(String),
}

/// Trait común para los servicios de catálogo
///
/// Implementations talk to the remote service and return its payloads as-is;
/// normalization and failure absorption belong to [`CatalogAdapter`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Runs a catalog search of the given kind.
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: usize,
    ) -> Result<RawSearchResult, CatalogError>;

    /// Fetches the most popular tracks of an artist.
    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<RawTrack>, CatalogError>;
}

// Payloads del catálogo. Every field is optional: the service omits data freely.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub tracks: Option<Page<RawTrack>>,
    #[serde(default)]
    pub artists: Option<Page<RawArtist>>,
    #[serde(default)]
    pub albums: Option<Page<RawAlbum>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(Some).collect(),
        }
    }

    /// Items with the null entries dropped.
    pub fn present(self) -> impl Iterator<Item = T> {
        self.items.into_iter().flatten()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<RawArtist>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawArtist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAlbum {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<RawImage>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Representa un track normalizado
///
/// Built only from catalog payloads; missing data is replaced by the
/// `UNKNOWN_*` placeholders so no field is ever absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    title: String,
    artist: String,
    album: String,
    popularity: u8,
    popularity_score: u8,
    genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    image_url: String,
    external_url: String,
    preview_url: String,
}

impl Track {
    /// Normalizes a raw catalog track, tagging it with the query that
    /// produced it (`genre`).
    pub fn from_raw(raw: &RawTrack, genre: impl Into<String>) -> Self {
        let popularity = raw.popularity.unwrap_or(0).min(100) as u8;

        Self {
            title: non_blank(raw.name.as_deref()).unwrap_or(UNKNOWN_TITLE).to_string(),
            artist: non_blank(raw.artists.first().and_then(|a| a.name.as_deref()))
                .unwrap_or(UNKNOWN_ARTIST)
                .to_string(),
            album: non_blank(raw.album.as_ref().and_then(|a| a.name.as_deref()))
                .unwrap_or(UNKNOWN_ALBUM)
                .to_string(),
            popularity,
            popularity_score: popularity,
            genre: genre.into(),
            theme: None,
            image_url: raw
                .album
                .as_ref()
                .and_then(|a| a.images.first())
                .and_then(|image| non_blank(image.url.as_deref()))
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
            external_url: raw.external_urls.spotify.clone().unwrap_or_default(),
            preview_url: raw.preview_url.clone().unwrap_or_default(),
        }
    }

    // Getters
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn artist(&self) -> &str {
        &self.artist
    }
    pub fn album(&self) -> &str {
        &self.album
    }
    pub fn popularity(&self) -> u8 {
        self.popularity
    }
    pub fn popularity_score(&self) -> u8 {
        self.popularity_score
    }
    pub fn genre(&self) -> &str {
        &self.genre
    }
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
    pub fn external_url(&self) -> &str {
        &self.external_url
    }
    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
