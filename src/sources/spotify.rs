//! Spotify Web API client.
//!
//! Uses the Client Credentials flow: the access token is exchanged once and
//! reused until shortly before it expires.

use async_trait::async_trait;
use base64::Engine;
use parking_lot::RwLock;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::{CatalogError, CatalogService, RawSearchResult, RawTrack, SearchKind};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<Option<RawTrack>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client_id: String,
    client_secret: String,
    market: String,
    client: reqwest::Client,
    token: RwLock<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Creates a client whose every request is bounded by `timeout`.
    pub fn new(
        client_id: String,
        client_secret: String,
        market: String,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client_id,
            client_secret,
            market,
            client,
            token: RwLock::new(None),
        })
    }

    /// Returns a valid access token, exchanging credentials when needed.
    async fn access_token(&self) -> Result<String, CatalogError> {
        let cached = self
            .token
            .read()
            .as_ref()
            .filter(|token| token.expires_at > Instant::now())
            .map(|token| token.access_token.clone());
        if let Some(access_token) = cached {
            return Ok(access_token);
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *self.token.write() = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, CatalogError> {
        debug!("🔑 Requesting Spotify access token");

        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .client
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("❌ Spotify token exchange failed: {} - {}", status, body);
            return Err(CatalogError::Auth(format!("{} - {}", status, body)));
        }

        let body: TokenResponse = decode(response).await?;
        info!("✅ Spotify access token obtained (valid {}s)", body.expires_in);

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Token revocado antes de tiempo: el próximo intento pedirá otro
            *self.token.write() = None;
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok());
            return Err(CatalogError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    response.json().await.map_err(|e| {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e)
        }
    })
}

#[async_trait]
impl CatalogService for SpotifyClient {
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: usize,
    ) -> Result<RawSearchResult, CatalogError> {
        debug!("🔍 Spotify search ({}): {}", kind.as_str(), query);

        let limit = limit.to_string();
        self.get(
            &format!("{}/search", API_BASE),
            &[("q", query), ("type", kind.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<RawTrack>, CatalogError> {
        let url = format!(
            "{}/artists/{}/top-tracks",
            API_BASE,
            urlencoding::encode(artist_id)
        );
        let response: TopTracksResponse = self.get(&url, &[("market", self.market.as_str())]).await?;

        Ok(response.tracks.into_iter().flatten().collect())
    }
}
