//! Theme → genre mapping.
//!
//! The table is read once from a CSV file with `theme` and `genre` columns
//! and never changes afterwards. When the file cannot be used, a small
//! built-in table takes its place.
//!
//! Records are one per line. Quoted fields may contain commas but not line
//! breaks: a quoted newline splits the record in two.

use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

const FALLBACK_TABLE: [(&str, [&str; 2]); 4] = [
    ("joyeux", ["pop", "dance"]),
    ("triste", ["acoustic", "indie"]),
    ("calme", ["lo-fi", "jazz"]),
    ("énergique", ["electronic", "rock"]),
];

#[derive(Debug, Error)]
pub enum ThemeSourceError {
    #[error("cannot read theme source: {0}")]
    Io(#[from] std::io::Error),

    #[error("theme source has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("theme source contains no usable rows")]
    Empty,
}

/// Immutable mapping from theme name to its ordered genre tags.
#[derive(Debug, Clone)]
pub struct ThemeTable {
    entries: Vec<(String, Vec<String>)>,
}

impl ThemeTable {
    /// Loads the table from `path`, falling back to the built-in table on
    /// any error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(table) => {
                info!("🎨 Loaded {} themes from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                warn!("⚠️ Theme source {} unusable ({}), using built-in themes", path.display(), e);
                Self::fallback()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ThemeSourceError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses CSV text, grouping genres by theme in first-seen order.
    pub fn parse(contents: &str) -> Result<Self, ThemeSourceError> {
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());

        let header = lines.next().ok_or(ThemeSourceError::Empty)?;
        let columns = split_record(header.trim_start_matches('\u{feff}'));
        let column = |name: &'static str| {
            columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(name))
                .ok_or(ThemeSourceError::MissingColumn(name))
        };
        let theme_idx = column("theme")?;
        let genre_idx = column("genre")?;

        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        for line in lines {
            let fields = split_record(line);
            let theme = fields.get(theme_idx).map(|s| s.trim()).unwrap_or_default();
            let genre = fields.get(genre_idx).map(|s| s.trim()).unwrap_or_default();
            if theme.is_empty() || genre.is_empty() {
                continue;
            }

            match entries.iter_mut().find(|(name, _)| name == theme) {
                Some((_, genres)) => genres.push(genre.to_string()),
                None => entries.push((theme.to_string(), vec![genre.to_string()])),
            }
        }

        if entries.is_empty() {
            return Err(ThemeSourceError::Empty);
        }

        Ok(Self { entries })
    }

    pub fn fallback() -> Self {
        let entries = FALLBACK_TABLE
            .iter()
            .map(|(theme, genres)| {
                (
                    theme.to_string(),
                    genres.iter().map(|g| g.to_string()).collect(),
                )
            })
            .collect();

        Self { entries }
    }

    pub fn themes(&self) -> Vec<&str> {
        self.entries.iter().map(|(theme, _)| theme.as_str()).collect()
    }

    /// Genres of `theme`, empty when the theme is unknown.
    pub fn genres_for(&self, theme: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(name, _)| name == theme)
            .map(|(_, genres)| genres.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, theme: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == theme)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits one CSV record. Double-quoted fields may contain commas and `""`
/// escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
