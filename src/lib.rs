//! # mood2music
//!
//! Mood-based music recommendations on top of the Spotify catalog.
//!
//! A [`ThemeTable`] maps moods ("calme", "joyeux", …) to catalog genres. The
//! [`ResolutionEngine`] turns a free-text query and an optional theme into a
//! ranked [`SearchResponse`], reusing recent answers from a short-lived cache
//! and falling back to theme picks when the query finds nothing.
//!
//! ```rust,no_run
//! use mood2music::{Config, ResolutionEngine};
//!
//! # async fn example() -> mood2music::Result<()> {
//! let config = Config::load()?;
//! let engine = ResolutionEngine::from_config(&config)?;
//!
//! let response = engine.resolve("daft punk", Some("joyeux"), 10).await;
//! println!("{}: {} tracks", response.search_info.message, response.total_found);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod sources;
pub mod themes;

pub use config::Config;
pub use engine::{detect_theme, ResolutionEngine, ResponseKind, SearchInfo, SearchResponse};
pub use error::{Error, Result};
pub use sources::{Suggestion, Track};
pub use themes::ThemeTable;
