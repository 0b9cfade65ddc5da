//! Error types shared across the crate.

use thiserror::Error;

use crate::sources::CatalogError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the resolution layer.
///
/// Catalog failures normally never reach callers: the adapter absorbs them
/// into [`crate::sources::Fetch::Degraded`]. The variant exists so that
/// [`crate::sources::CatalogService`] implementations can be driven directly.
#[derive(Debug, Error)]
pub enum Error {
    /// Required settings are missing or invalid at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller asked for a theme absent from the theme table.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
