//! Catalog adapter: the only consumer of [`CatalogService`].
//!
//! Every call is normalized into [`Track`] records. Failures never escape:
//! a failing call is logged and reported as [`Fetch::Degraded`], which
//! carries no tracks.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{CatalogService, RawArtist, SearchKind, Track, UNKNOWN_ARTIST};

/// Largest page the catalog serves for one search.
pub const MAX_PAGE_SIZE: usize = 50;

/// Top tracks kept per artist for artist searches.
pub const TOP_TRACKS_PER_ARTIST: usize = 5;

pub const SEARCH_RESULT_GENRE: &str = "search_result";
pub const POPULAR_GENRE: &str = "popular";

/// Outcome of one adapter operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Ok(Vec<Track>),
    /// The call failed; `cause` has already been logged.
    Degraded { cause: String },
}

impl Fetch {
    fn degraded(context: &str, cause: impl Display) -> Self {
        warn!("⚠️ {} failed, continuing without results: {}", context, cause);
        Fetch::Degraded {
            cause: cause.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetch::Degraded { .. })
    }

    pub fn into_tracks(self) -> Vec<Track> {
        match self {
            Fetch::Ok(tracks) => tracks,
            Fetch::Degraded { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Artist,
    Track,
}

/// Autocomplete entry: `label` is displayed, `value` is what gets searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub label: String,
    pub value: String,
}

pub struct CatalogAdapter {
    service: Arc<dyn CatalogService>,
}

impl CatalogAdapter {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self { service }
    }

    /// Tracks tagged with `genre`, from a genre-scoped search.
    pub async fn search_by_genre(&self, genre: &str, limit: usize) -> Fetch {
        let query = format!("genre:\"{}\"", genre);
        self.search_tracks(&query, limit, genre).await
    }

    /// Free-text search, sorted by popularity.
    ///
    /// Artist searches expand every matching artist into their top tracks.
    pub async fn search_text(&self, query: &str, kind: SearchKind, limit: usize) -> Fetch {
        let fetch = match kind {
            SearchKind::Track => self.search_tracks(query, limit, SEARCH_RESULT_GENRE).await,
            SearchKind::Artist => self.search_artist_tracks(query, limit).await,
            SearchKind::Album => {
                debug!("Album searches return no tracks: {}", query);
                Fetch::Ok(Vec::new())
            }
        };

        match fetch {
            Fetch::Ok(mut tracks) => {
                sort_by_popularity(&mut tracks);
                Fetch::Ok(tracks)
            }
            degraded => degraded,
        }
    }

    /// Tracks released this year, in catalog order.
    pub async fn search_current_popular(&self, limit: usize) -> Fetch {
        let query = format!("year:{}", Utc::now().year());
        self.search_tracks(&query, limit, POPULAR_GENRE).await
    }

    /// Artist names first, then `title - artist` track entries.
    pub async fn suggestions(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        let limit = limit.min(MAX_PAGE_SIZE);
        if limit == 0 {
            return Vec::new();
        }

        let mut suggestions = Vec::new();

        match self.service.search(partial, SearchKind::Artist, limit).await {
            Ok(result) => {
                let artists = result.artists.map(|page| page.present().collect::<Vec<_>>());
                for artist in artists.unwrap_or_default() {
                    if let Some(name) = artist.name.filter(|n| !n.trim().is_empty()) {
                        suggestions.push(Suggestion {
                            kind: SuggestionKind::Artist,
                            label: name.clone(),
                            value: name,
                        });
                    }
                }
            }
            Err(e) => {
                Fetch::degraded("artist suggestions", e);
            }
        }

        match self.service.search(partial, SearchKind::Track, limit).await {
            Ok(result) => {
                let tracks = result.tracks.map(|page| page.present().collect::<Vec<_>>());
                for raw in tracks.unwrap_or_default() {
                    let Some(title) = raw.name.clone().filter(|n| !n.trim().is_empty()) else {
                        continue;
                    };
                    let artist = Track::from_raw(&raw, SEARCH_RESULT_GENRE).artist().to_string();
                    suggestions.push(Suggestion {
                        kind: SuggestionKind::Track,
                        label: format!("{} - {}", title, artist),
                        value: title,
                    });
                }
            }
            Err(e) => {
                Fetch::degraded("track suggestions", e);
            }
        }

        suggestions.truncate(limit);
        suggestions
    }

    async fn search_tracks(&self, query: &str, limit: usize, genre: &str) -> Fetch {
        let limit = limit.min(MAX_PAGE_SIZE);
        if limit == 0 {
            return Fetch::Ok(Vec::new());
        }

        match self.service.search(query, SearchKind::Track, limit).await {
            Ok(result) => {
                let tracks: Vec<Track> = result
                    .tracks
                    .map(|page| page.present().map(|raw| Track::from_raw(&raw, genre)).collect())
                    .unwrap_or_default();
                debug!("✅ '{}': {} tracks", query, tracks.len());
                Fetch::Ok(tracks)
            }
            Err(e) => Fetch::degraded(&format!("search '{}'", query), e),
        }
    }

    async fn search_artist_tracks(&self, query: &str, limit: usize) -> Fetch {
        let limit = limit.min(MAX_PAGE_SIZE);
        if limit == 0 {
            return Fetch::Ok(Vec::new());
        }

        let artists: Vec<RawArtist> = match self.service.search(query, SearchKind::Artist, limit).await {
            Ok(result) => result
                .artists
                .map(|page| page.present().collect())
                .unwrap_or_default(),
            Err(e) => return Fetch::degraded(&format!("artist search '{}'", query), e),
        };

        let mut tracks = Vec::new();
        for artist in artists {
            let Some(artist_id) = artist.id.as_deref() else {
                continue;
            };
            let name = artist
                .name
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(UNKNOWN_ARTIST);

            // Un artista que falla no invalida a los demás
            match self.service.artist_top_tracks(artist_id).await {
                Ok(top) => {
                    let genre = format!("artist:{}", name);
                    tracks.extend(
                        top.iter()
                            .take(TOP_TRACKS_PER_ARTIST)
                            .map(|raw| Track::from_raw(raw, genre.as_str())),
                    );
                }
                Err(e) => {
                    Fetch::degraded(&format!("top tracks of {}", name), e);
                }
            }
        }

        Fetch::Ok(tracks)
    }
}

/// Stable sort, most popular first.
pub fn sort_by_popularity(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::{raw_track, FakeCatalog};
    use crate::sources::{CatalogError, MockCatalogService, Page, RawSearchResult};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn adapter(catalog: FakeCatalog) -> CatalogAdapter {
        CatalogAdapter::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_genre_search_tags_genre() {
        let catalog = FakeCatalog::default()
            .with_genre("jazz", vec![raw_track("so-what", "miles", 70), raw_track("naima", "trane", 60)]);
        let fetch = adapter(catalog).search_by_genre("jazz", 5).await;

        let tracks = fetch.into_tracks();
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.genre() == "jazz" && t.theme().is_none()));
    }

    #[tokio::test]
    async fn test_failing_call_degrades_to_empty() {
        let mut service = MockCatalogService::new();
        service
            .expect_search()
            .with(eq("genre:\"jazz\""), eq(SearchKind::Track), eq(5))
            .times(1)
            .returning(|_, _, _| Err(CatalogError::RateLimited { retry_after: None }));

        let fetch = CatalogAdapter::new(Arc::new(service)).search_by_genre("jazz", 5).await;

        assert!(fetch.is_degraded());
        assert!(fetch.into_tracks().is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_clamped_to_page_size() {
        let mut service = MockCatalogService::new();
        service
            .expect_search()
            .with(eq("lofi"), eq(SearchKind::Track), eq(MAX_PAGE_SIZE))
            .times(1)
            .returning(|_, _, _| Ok(RawSearchResult::default()));

        let fetch = CatalogAdapter::new(Arc::new(service))
            .search_text("lofi", SearchKind::Track, 80)
            .await;
        assert_eq!(fetch, Fetch::Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_zero_limit_skips_the_call() {
        let service = MockCatalogService::new();
        let fetch = CatalogAdapter::new(Arc::new(service)).search_by_genre("jazz", 0).await;
        assert_eq!(fetch, Fetch::Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_text_search_sorted_by_popularity() {
        let catalog = FakeCatalog::default().with_query(
            "daft",
            vec![raw_track("a", "x", 10), raw_track("b", "x", 90), raw_track("c", "x", 50)],
        );
        let tracks = adapter(catalog)
            .search_text("daft", SearchKind::Track, 10)
            .await
            .into_tracks();

        let popularity: Vec<u8> = tracks.iter().map(|t| t.popularity()).collect();
        assert_eq!(popularity, vec![90, 50, 10]);
        assert!(tracks.iter().all(|t| t.genre() == SEARCH_RESULT_GENRE));
    }

    #[tokio::test]
    async fn test_artist_search_expands_top_tracks() {
        let mut catalog = FakeCatalog::default();
        catalog.artists.insert(
            "daft".to_string(),
            vec![
                RawArtist { id: Some("a1".into()), name: Some("Daft Punk".into()) },
                RawArtist { id: Some("a2".into()), name: Some("Daft Twin".into()) },
                RawArtist { id: None, name: Some("No Id".into()) },
            ],
        );
        catalog.top_tracks.insert(
            "a1".to_string(),
            (0..8).map(|i| raw_track(&format!("t{}", i), "Daft Punk", 50 + i)).collect(),
        );
        let catalog = catalog.failing_on("a2");

        let tracks = adapter(catalog)
            .search_text("daft", SearchKind::Artist, 10)
            .await
            .into_tracks();

        assert_eq!(tracks.len(), TOP_TRACKS_PER_ARTIST);
        assert!(tracks.iter().all(|t| t.genre() == "artist:Daft Punk"));
        assert_eq!(tracks[0].popularity(), 54);
    }

    #[tokio::test]
    async fn test_popular_uses_current_year() {
        let year = Utc::now().year();
        let mut service = MockCatalogService::new();
        service
            .expect_search()
            .with(eq(format!("year:{}", year)), eq(SearchKind::Track), eq(3))
            .times(1)
            .returning(|_, _, _| {
                Ok(RawSearchResult {
                    tracks: Some(Page::new(vec![raw_track("hit", "star", 99)])),
                    ..Default::default()
                })
            });

        let tracks = CatalogAdapter::new(Arc::new(service))
            .search_current_popular(3)
            .await
            .into_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].genre(), POPULAR_GENRE);
    }

    #[tokio::test]
    async fn test_suggestions_list_artists_then_tracks() {
        let mut catalog = FakeCatalog::default()
            .with_query("dafb", vec![raw_track("One More Time", "Daft Punk", 80)]);
        catalog.artists.insert(
            "dafb".to_string(),
            vec![RawArtist { id: Some("a1".into()), name: Some("Daft Punk".into()) }],
        );

        let suggestions = adapter(catalog).suggestions("dafb", 5).await;
        assert_eq!(
            suggestions,
            vec![
                Suggestion {
                    kind: SuggestionKind::Artist,
                    label: "Daft Punk".to_string(),
                    value: "Daft Punk".to_string(),
                },
                Suggestion {
                    kind: SuggestionKind::Track,
                    label: "One More Time - Daft Punk".to_string(),
                    value: "One More Time".to_string(),
                },
            ]
        );
    }
}
