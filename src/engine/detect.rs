//! Popularity-based theme guess for tracks found without a requested theme.
//!
//! The thresholds carry no measured meaning; they are kept exactly as they
//! are so existing results stay stable.

pub const JOYEUX: &str = "joyeux";
pub const ENERGIQUE: &str = "énergique";
pub const CALME: &str = "calme";
pub const MELANCOLIQUE: &str = "mélancolique";

/// `> 80` joyeux, `> 60` énergique, `> 40` calme, otherwise mélancolique.
pub fn detect_theme(popularity: u8) -> &'static str {
    match popularity {
        81.. => JOYEUX,
        61..=80 => ENERGIQUE,
        41..=60 => CALME,
        _ => MELANCOLIQUE,
    }
}
