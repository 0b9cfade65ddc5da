//! # Resolution Engine
//!
//! Decides, for a `(query, theme, limit)` request, which catalog calls to
//! make, merges and ranks what comes back, and picks a fallback when the
//! query finds nothing.
//!
//! ```text
//! resolve ─► cache ─► CatalogAdapter (0..N calls) ─► rank/truncate ─► cache
//! ```
//!
//! Every computed result is cached under a key derived from its inputs, so
//! repeated requests within the TTL never reach the catalog.

pub mod detect;
pub mod response;

pub use detect::detect_theme;
pub use response::{ResponseKind, SearchInfo, SearchResponse};

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CachedValue, ResolutionCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sources::catalog::sort_by_popularity;
use crate::sources::{CatalogAdapter, Fetch, SearchKind, SpotifyClient, Suggestion, Track};
use crate::themes::ThemeTable;

/// At most this many genres are queried for one theme.
const MAX_GENRES_PER_THEME: usize = 5;

/// Tracks fetched per genre for theme-only searches.
const THEME_ONLY_PER_GENRE: usize = 4;

/// Tracks fetched per genre when a text search falls back to its theme.
const FALLBACK_PER_GENRE: usize = 3;

/// Lower bound of the per-genre fetch in paginated theme listings.
const EXTENDED_MIN_PER_GENRE: usize = 3;

const SUGGESTION_MIN_CHARS: usize = 2;

pub struct ResolutionEngine {
    catalog: CatalogAdapter,
    themes: ThemeTable,
    cache: ResolutionCache,
    // Un cálculo por clave a la vez
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl ResolutionEngine {
    pub fn new(catalog: CatalogAdapter, themes: ThemeTable, cache: ResolutionCache) -> Self {
        Self {
            catalog,
            themes,
            cache,
            in_flight: DashMap::new(),
        }
    }

    /// Wires the Spotify client, theme table and cache described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = SpotifyClient::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.market.clone(),
            config.request_timeout(),
        )?;

        let themes = ThemeTable::load(&config.themes_csv);
        let cache = ResolutionCache::new(config.cache_ttl(), config.cache_capacity);

        Ok(Self::new(CatalogAdapter::new(Arc::new(client)), themes, cache))
    }

    pub fn themes(&self) -> Vec<String> {
        self.themes.themes().into_iter().map(str::to_string).collect()
    }

    pub fn genres_for(&self, theme: &str) -> Vec<String> {
        self.themes.genres_for(theme).to_vec()
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Sweeps expired cache entries and returns how many were removed.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_old_entries()
    }

    /// Sweeps the cache every `period` until the engine is dropped.
    pub fn spawn_maintenance(engine: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let engine = Arc::downgrade(engine);
        let period = period.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // El primer tick es inmediato
            interval.tick().await;

            loop {
                interval.tick().await;
                match engine.upgrade() {
                    Some(engine) => {
                        engine.cleanup_cache();
                    }
                    None => break,
                }
            }
            debug!("Cache maintenance stopped");
        })
    }

    /// Answers a search request, from the cache when possible.
    ///
    /// Never fails: internal errors become a [`ResponseKind::Error`]
    /// response whose cause is only logged.
    pub async fn resolve(&self, query: &str, theme: Option<&str>, limit: usize) -> SearchResponse {
        let theme = theme.map(str::trim).filter(|t| !t.is_empty());
        let key = search_key(query, theme, limit);

        if let Some(response) = self.cached_response(&key) {
            return response;
        }

        let _slot = InFlightSlot {
            in_flight: &self.in_flight,
            key: &key,
        };
        let lock = self.in_flight.entry(key.clone()).or_default().clone();
        let _guard = lock.lock().await;

        // Otra tarea pudo haberlo calculado mientras esperábamos
        if let Some(response) = self.cached_response(&key) {
            return response;
        }

        let response = match self.compute(query, theme, limit).await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Search failed for '{}' (theme: {:?}): {}", query, theme, e);
                SearchResponse::error()
            }
        };
        info!(
            "🎵 '{}' (theme: {:?}) → {:?}, {} tracks",
            query,
            theme,
            response.kind(),
            response.total_found
        );
        self.cache.put(key.clone(), CachedValue::Response(response.clone()));
        response
    }

    async fn compute(&self, query: &str, theme: Option<&str>, limit: usize) -> Result<SearchResponse> {
        let trimmed = query.trim();

        if trimmed.is_empty() {
            return match theme {
                Some(theme) => {
                    let results = self.songs_by_theme(theme, THEME_ONLY_PER_GENRE, limit).await?;
                    Ok(SearchResponse::new(results, SearchInfo::theme_only(theme)))
                }
                None => Ok(SearchResponse::new(
                    self.popular_tracks(limit).await,
                    SearchInfo::popular(),
                )),
            };
        }

        // Se piden el doble para compensar el filtrado por tema
        let fetch = self
            .catalog
            .search_text(trimmed, SearchKind::Track, limit.saturating_mul(2))
            .await;
        if let Fetch::Degraded { cause } = &fetch {
            warn!("Text search for '{}' degraded: {}", trimmed, cause);
        }

        let mut results: Vec<Track> = fetch
            .into_tracks()
            .into_iter()
            .map(|track| {
                let assigned = theme.unwrap_or_else(|| detect_theme(track.popularity()));
                track.with_theme(assigned)
            })
            .filter(|track| theme.is_none() || track.theme() == theme)
            .collect();
        rank(&mut results, limit);

        if !results.is_empty() {
            return Ok(SearchResponse::new(results, SearchInfo::search(query, theme)));
        }

        match theme {
            Some(theme) => {
                debug!("No results for '{}', falling back to theme '{}'", query, theme);
                let results = self.songs_by_theme(theme, FALLBACK_PER_GENRE, limit).await?;
                Ok(SearchResponse::new(results, SearchInfo::fallback_theme(query, theme)))
            }
            None => Ok(SearchResponse::new(Vec::new(), SearchInfo::no_results(query))),
        }
    }

    /// Most popular tracks across the first genres of `theme`.
    pub async fn songs_by_theme(
        &self,
        theme: &str,
        limit_per_genre: usize,
        max_total: usize,
    ) -> Result<Vec<Track>> {
        if !self.themes.contains(theme) {
            return Err(Error::UnknownTheme(theme.to_string()));
        }

        let key = format!("theme_{}_{}_{}", theme, limit_per_genre, max_total);
        if let Some(CachedValue::Tracks(tracks)) = self.cache.get(&key) {
            debug!("✅ Cache hit: {}", key);
            return Ok(tracks);
        }

        let genres = self.themes.genres_for(theme);
        let (mut tracks, complete) = self
            .collect_genres(theme, &genres[..genres.len().min(MAX_GENRES_PER_THEME)], limit_per_genre)
            .await;
        rank(&mut tracks, max_total);

        if complete {
            self.cache.put(key, CachedValue::Tracks(tracks.clone()));
        }
        Ok(tracks)
    }

    /// One page of the full popularity-sorted candidate set of `theme`,
    /// drawn from every genre of the theme.
    pub async fn extended_songs_by_theme(
        &self,
        theme: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Track>> {
        if !self.themes.contains(theme) {
            return Err(Error::UnknownTheme(theme.to_string()));
        }

        let genres = self.themes.genres_for(theme);
        let per_genre = match genres.len() {
            0 => EXTENDED_MIN_PER_GENRE,
            count => EXTENDED_MIN_PER_GENRE.max(limit / count),
        };

        let (mut tracks, _) = self.collect_genres(theme, genres, per_genre).await;
        sort_by_popularity(&mut tracks);

        Ok(tracks.into_iter().skip(offset).take(limit).collect())
    }

    /// Tracks of the current year, most popular first, each with a guessed theme.
    pub async fn popular_tracks(&self, limit: usize) -> Vec<Track> {
        let key = format!("popular_tracks_{}", limit);
        if let Some(CachedValue::Tracks(tracks)) = self.cache.get(&key) {
            return tracks;
        }

        let fetch = self.catalog.search_current_popular(limit).await;
        let complete = !fetch.is_degraded();

        let mut tracks: Vec<Track> = fetch
            .into_tracks()
            .into_iter()
            .map(|track| {
                let theme = detect_theme(track.popularity());
                track.with_theme(theme)
            })
            .collect();
        rank(&mut tracks, limit);

        if complete {
            self.cache.put(key, CachedValue::Tracks(tracks.clone()));
        }
        tracks
    }

    /// Autocomplete entries; empty below two characters.
    pub async fn search_suggestions(&self, partial_query: &str, limit: usize) -> Vec<Suggestion> {
        let partial = partial_query.trim();
        if partial.chars().count() < SUGGESTION_MIN_CHARS {
            return Vec::new();
        }

        self.catalog.suggestions(partial, limit).await
    }

    fn cached_response(&self, key: &str) -> Option<SearchResponse> {
        match self.cache.get(&key.to_string()) {
            Some(CachedValue::Response(response)) => {
                debug!("✅ Cache hit: {}", key);
                Some(response)
            }
            _ => None,
        }
    }

    /// Concatenates the tracks of `genres`, tagged with `theme`. The flag is
    /// false when any genre call degraded.
    async fn collect_genres(&self, theme: &str, genres: &[String], per_genre: usize) -> (Vec<Track>, bool) {
        let mut tracks = Vec::new();
        let mut complete = true;

        for genre in genres {
            let fetch = self.tracks_for_genre(genre, per_genre).await;
            complete &= !fetch.is_degraded();
            tracks.extend(fetch.into_tracks().into_iter().map(|t| t.with_theme(theme)));
        }

        (tracks, complete)
    }

    async fn tracks_for_genre(&self, genre: &str, limit: usize) -> Fetch {
        let key = format!("genre_{}_{}", genre, limit);
        if let Some(CachedValue::Tracks(tracks)) = self.cache.get(&key) {
            return Fetch::Ok(tracks);
        }

        let fetch = self.catalog.search_by_genre(genre, limit).await;
        if let Fetch::Ok(tracks) = &fetch {
            self.cache.put(key, CachedValue::Tracks(tracks.clone()));
        }
        fetch
    }
}

/// Cache key of a `resolve` request. Free text is length-prefixed so that
/// underscores in the query or theme cannot make two requests collide.
fn search_key(query: &str, theme: Option<&str>, limit: usize) -> String {
    let theme = theme.unwrap_or("");
    format!(
        "smart_search_{}:{}_{}:{}_{}",
        query.len(),
        query,
        theme.len(),
        theme,
        limit
    )
}

/// Drops the in-flight entry of a key once no other request waits on it.
/// Runs on completion and on cancellation alike.
struct InFlightSlot<'a> {
    in_flight: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Most popular first, at most `limit`.
fn rank(tracks: &mut Vec<Track>, limit: usize) {
    sort_by_popularity(tracks);
    tracks.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::{raw_track, FakeCatalog};
    use crate::sources::RawTrack;
    use pretty_assertions::assert_eq;

    fn genre_tracks(prefix: &str, popularity: &[u32]) -> Vec<RawTrack> {
        popularity
            .iter()
            .enumerate()
            .map(|(i, p)| raw_track(&format!("{}-{}", prefix, i), prefix, *p))
            .collect()
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog::default()
            .with_genre("lo-fi", genre_tracks("lofi", &[55, 20, 70, 35, 10]))
            .with_genre("jazz", genre_tracks("jazz", &[90, 45, 65, 5, 50]))
            .with_genre("pop", genre_tracks("pop", &[99, 88]))
            .with_genre("dance", genre_tracks("dance", &[77]))
    }

    fn engine_with(catalog: FakeCatalog) -> (ResolutionEngine, Arc<FakeCatalog>) {
        engine_with_table(catalog, ThemeTable::fallback())
    }

    fn engine_with_table(catalog: FakeCatalog, table: ThemeTable) -> (ResolutionEngine, Arc<FakeCatalog>) {
        let catalog = Arc::new(catalog);
        let engine = ResolutionEngine::new(
            CatalogAdapter::new(catalog.clone()),
            table,
            ResolutionCache::new(Duration::from_secs(300), 100),
        );
        (engine, catalog)
    }

    fn popularity(tracks: &[Track]) -> Vec<u8> {
        tracks.iter().map(|t| t.popularity()).collect()
    }

    fn is_non_increasing(tracks: &[Track]) -> bool {
        tracks.windows(2).all(|w| w[0].popularity() >= w[1].popularity())
    }

    #[tokio::test]
    async fn test_songs_by_theme_ranks_and_truncates() {
        let (engine, _) = engine_with(catalog());
        let tracks = engine.songs_by_theme("calme", 3, 4).await.unwrap();

        assert_eq!(popularity(&tracks), vec![90, 70, 65, 55]);
        assert!(tracks.iter().all(|t| t.theme() == Some("calme")));
    }

    #[tokio::test]
    async fn test_songs_by_theme_never_exceeds_limit() {
        let (engine, _) = engine_with(catalog());
        for k in 0..8 {
            let tracks = engine.songs_by_theme("calme", k, k).await.unwrap();
            assert!(tracks.len() <= k);
            assert!(is_non_increasing(&tracks));
        }
    }

    #[tokio::test]
    async fn test_unknown_theme_is_signaled() {
        let (engine, catalog) = engine_with(catalog());

        let result = engine.songs_by_theme("not_a_real_theme", 2, 10).await;
        assert!(matches!(result, Err(Error::UnknownTheme(theme)) if theme == "not_a_real_theme"));

        let result = engine.extended_songs_by_theme("not_a_real_theme", 0, 10).await;
        assert!(matches!(result, Err(Error::UnknownTheme(_))));
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_theme_query_caps_genres() {
        let table = ThemeTable::parse(
            "theme,genre\n\
             fête,g1\nfête,g2\nfête,g3\nfête,g4\nfête,g5\nfête,g6\nfête,g7\n",
        )
        .unwrap();
        let (engine, catalog) = engine_with_table(FakeCatalog::default(), table);

        engine.songs_by_theme("fête", 2, 10).await.unwrap();
        assert_eq!(catalog.calls(), MAX_GENRES_PER_THEME);

        engine.extended_songs_by_theme("fête", 0, 10).await.unwrap();
        assert_eq!(catalog.calls(), MAX_GENRES_PER_THEME + 7);
    }

    #[tokio::test]
    async fn test_blank_query_with_theme_is_theme_only() {
        let (engine, _) = engine_with(catalog());
        let response = engine.resolve("   ", Some("joyeux"), 2).await;

        assert_eq!(response.kind(), ResponseKind::ThemeOnly);
        assert_eq!(popularity(&response.results), vec![99, 88]);
        assert_eq!(response.total_found, 2);
        assert_eq!(response.search_info.theme.as_deref(), Some("joyeux"));
    }

    #[tokio::test]
    async fn test_blank_query_without_theme_is_popular() {
        let catalog = catalog().with_popular(genre_tracks("hit", &[40, 95, 70, 10, 85, 60, 30, 20, 50, 65, 75, 15]));
        let (engine, _) = engine_with(catalog);
        let response = engine.resolve("", None, 10).await;

        assert_eq!(response.kind(), ResponseKind::Popular);
        assert!(response.results.len() <= 10);
        assert!(response.results.iter().all(|t| t.genre() == "popular"));
        assert!(response.results.iter().all(|t| t.theme().is_some()));
        assert!(is_non_increasing(&response.results));
    }

    #[tokio::test]
    async fn test_text_search_without_theme_detects_theme() {
        let catalog = catalog().with_query("daft", genre_tracks("daft", &[30, 85, 62]));
        let (engine, _) = engine_with(catalog);
        let response = engine.resolve("daft", None, 5).await;

        assert_eq!(response.kind(), ResponseKind::SearchOnly);
        let themes: Vec<Option<&str>> = response.results.iter().map(|t| t.theme()).collect();
        assert_eq!(themes, vec![Some("joyeux"), Some("énergique"), Some("mélancolique")]);
        assert_eq!(response.search_info.query.as_deref(), Some("daft"));
    }

    #[tokio::test]
    async fn test_text_search_with_theme_keeps_requested_theme() {
        let catalog = catalog().with_query("daft", genre_tracks("daft", &[30, 85, 62, 10, 99]));
        let (engine, _) = engine_with(catalog);
        let response = engine.resolve("daft", Some("calme"), 3).await;

        assert_eq!(response.kind(), ResponseKind::SearchWithTheme);
        assert_eq!(popularity(&response.results), vec![99, 85, 62]);
        assert!(response.results.iter().all(|t| t.theme() == Some("calme")));
    }

    #[tokio::test]
    async fn test_empty_search_falls_back_to_theme() {
        let (engine, _) = engine_with(catalog());
        let response = engine.resolve("zzzznonexistentqueryxx", Some("calme"), 5).await;

        assert_eq!(response.kind(), ResponseKind::FallbackTheme);
        assert!(!response.results.is_empty());
        let expected = engine.songs_by_theme("calme", FALLBACK_PER_GENRE, 5).await.unwrap();
        assert_eq!(response.results, expected);
    }

    #[tokio::test]
    async fn test_failed_search_degrades_into_fallback() {
        let catalog = catalog().failing_on("daft");
        let (engine, _) = engine_with(catalog);
        let response = engine.resolve("daft", Some("calme"), 5).await;

        assert_eq!(response.kind(), ResponseKind::FallbackTheme);
    }

    #[tokio::test]
    async fn test_empty_search_without_theme_is_no_results() {
        let (engine, _) = engine_with(catalog());
        let response = engine.resolve("zzzznonexistentqueryxx", None, 5).await;

        assert_eq!(response.kind(), ResponseKind::NoResults);
        assert!(response.results.is_empty());
        assert_eq!(response.total_found, 0);
    }

    #[tokio::test]
    async fn test_unknown_theme_in_resolve_becomes_error_response() {
        let (engine, _) = engine_with(catalog());
        let response = engine.resolve("", Some("not_a_real_theme"), 5).await;

        assert_eq!(response.kind(), ResponseKind::Error);
        assert_eq!(response.search_info.message, "search failed");
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_reuses_cached_response() {
        let catalog = catalog().with_query("daft", genre_tracks("daft", &[30, 85]));
        let (engine, catalog) = engine_with(catalog);

        let first = engine.resolve("daft", None, 5).await;
        let calls = catalog.calls();
        let second = engine.resolve("daft", None, 5).await;

        assert_eq!(first, second);
        assert_eq!(catalog.calls(), calls);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolves_compute_once() {
        let catalog = catalog()
            .with_query("daft", genre_tracks("daft", &[30, 85]))
            .with_delay(Duration::from_millis(50));
        let (engine, catalog) = engine_with(catalog);
        let engine = Arc::new(engine);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.resolve("daft", None, 5).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().kind(), ResponseKind::SearchOnly);
        }

        assert_eq!(catalog.calls(), 1);
        assert!(engine.in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_resolve_releases_in_flight_entry() {
        let catalog = catalog()
            .with_query("daft", genre_tracks("daft", &[30, 85]))
            .with_delay(Duration::from_secs(5));
        let (engine, catalog) = engine_with(catalog);
        let engine = Arc::new(engine);

        let task = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.resolve("daft", None, 5).await })
        };
        // La tarea queda bloqueada dentro del catálogo con el lock tomado
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(catalog.calls(), 1);
        assert_eq!(engine.in_flight.len(), 1);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(engine.in_flight.is_empty());
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn test_underscores_do_not_share_cache_entries() {
        let table = ThemeTable::parse("theme,genre\ny_5,jazz\n5,pop\n").unwrap();
        let catalog = FakeCatalog::default()
            .with_query("x", genre_tracks("x", &[70]))
            .with_query("x_y", genre_tracks("xy", &[20, 10]));
        let (engine, _) = engine_with_table(catalog, table);

        let first = engine.resolve("x", Some("y_5"), 5).await;
        let second = engine.resolve("x_y", Some("5"), 5).await;

        assert_eq!(first.search_info.query.as_deref(), Some("x"));
        assert_eq!(second.search_info.query.as_deref(), Some("x_y"));
        assert_eq!(popularity(&second.results), vec![20, 10]);
        assert_ne!(search_key("x", Some("y_5"), 5), search_key("x_y", Some("5"), 5));
    }

    #[tokio::test]
    async fn test_maintenance_sweeps_until_engine_dropped() {
        let engine = Arc::new(ResolutionEngine::new(
            CatalogAdapter::new(Arc::new(catalog())),
            ThemeTable::fallback(),
            ResolutionCache::new(Duration::from_millis(20), 100),
        ));
        engine.songs_by_theme("calme", 2, 4).await.unwrap();
        assert!(!engine.cache().is_empty());

        let maintenance = ResolutionEngine::spawn_maintenance(&engine, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(engine.cache().is_empty());

        drop(engine);
        tokio::time::timeout(Duration::from_secs(1), maintenance)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_degraded_genre_is_not_cached() {
        let catalog = catalog().failing_on("genre:\"jazz\"");
        let (engine, catalog) = engine_with(catalog);

        let tracks = engine.songs_by_theme("calme", 3, 10).await.unwrap();
        assert_eq!(popularity(&tracks), vec![70, 55, 20]);

        engine.songs_by_theme("calme", 3, 10).await.unwrap();
        // lo-fi sale de la caché, jazz se reintenta en cada llamada
        assert_eq!(catalog.calls(), 3);
    }

    #[tokio::test]
    async fn test_extended_pagination_slices_sorted_candidates() {
        let table = ThemeTable::parse(
            "theme,genre\n\
             nuit,a\nnuit,b\nnuit,c\nnuit,d\n",
        )
        .unwrap();
        let catalog = FakeCatalog::default()
            .with_genre("a", genre_tracks("a", &[12, 48, 97, 3]))
            .with_genre("b", genre_tracks("b", &[66, 25, 81]))
            .with_genre("c", genre_tracks("c", &[59, 90, 7, 34]))
            .with_genre("d", genre_tracks("d", &[72, 18, 44]));
        let (engine, _) = engine_with_table(catalog, table);

        // max(3, 5 / 4) = 3 por género
        let mut candidates: Vec<u8> = vec![12, 48, 97, 66, 25, 81, 59, 90, 7, 72, 18, 44];
        candidates.sort_by(|a, b| b.cmp(a));

        let page = engine.extended_songs_by_theme("nuit", 5, 5).await.unwrap();
        assert_eq!(popularity(&page), candidates[5..10].to_vec());
        assert!(page.iter().all(|t| t.theme() == Some("nuit")));

        let past_end = engine.extended_songs_by_theme("nuit", 50, 5).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_short_suggestion_query_skips_catalog() {
        let (engine, catalog) = engine_with(catalog());

        assert!(engine.search_suggestions("d", 5).await.is_empty());
        assert!(engine.search_suggestions(" é ", 5).await.is_empty());
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_themes_in_table_order() {
        let (engine, _) = engine_with(catalog());
        assert_eq!(engine.themes(), vec!["joyeux", "triste", "calme", "énergique"]);
        assert_eq!(engine.genres_for("calme"), vec!["lo-fi", "jazz"]);
    }
}
