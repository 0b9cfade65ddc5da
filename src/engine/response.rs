use serde::{Deserialize, Serialize};

use crate::sources::Track;

/// How a search was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    ThemeOnly,
    SearchOnly,
    SearchWithTheme,
    FallbackTheme,
    Popular,
    NoResults,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub message: String,
}

impl SearchInfo {
    pub fn theme_only(theme: &str) -> Self {
        Self {
            kind: ResponseKind::ThemeOnly,
            theme: Some(theme.to_string()),
            query: None,
            message: format!("Tracks for theme '{}'", theme),
        }
    }

    pub fn popular() -> Self {
        Self {
            kind: ResponseKind::Popular,
            theme: None,
            query: None,
            message: "Top popular tracks".to_string(),
        }
    }

    pub fn search(query: &str, theme: Option<&str>) -> Self {
        let (kind, message) = match theme {
            Some(theme) => (
                ResponseKind::SearchWithTheme,
                format!("Results for '{}' (theme: {})", query, theme),
            ),
            None => (ResponseKind::SearchOnly, format!("Results for '{}'", query)),
        };

        Self {
            kind,
            theme: theme.map(str::to_string),
            query: Some(query.to_string()),
            message,
        }
    }

    pub fn fallback_theme(query: &str, theme: &str) -> Self {
        Self {
            kind: ResponseKind::FallbackTheme,
            theme: Some(theme.to_string()),
            query: Some(query.to_string()),
            message: format!(
                "No results for '{}', here are suggestions from theme '{}'",
                query, theme
            ),
        }
    }

    pub fn no_results(query: &str) -> Self {
        Self {
            kind: ResponseKind::NoResults,
            theme: None,
            query: Some(query.to_string()),
            message: format!("No results found for '{}'", query),
        }
    }

    /// Generic failure; the cause is only logged.
    pub fn error() -> Self {
        Self {
            kind: ResponseKind::Error,
            theme: None,
            query: None,
            message: "search failed".to_string(),
        }
    }
}

/// Result of [`super::ResolutionEngine::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Track>,
    pub total_found: usize,
    pub search_info: SearchInfo,
}

impl SearchResponse {
    pub fn new(results: Vec<Track>, search_info: SearchInfo) -> Self {
        Self {
            total_found: results.len(),
            results,
            search_info,
        }
    }

    pub fn error() -> Self {
        Self::new(Vec::new(), SearchInfo::error())
    }

    pub fn kind(&self) -> ResponseKind {
        self.search_info.kind
    }
}
