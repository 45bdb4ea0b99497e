//! City tier classification derived from the brick balance.
//!
//! Tiers are purely cosmetic: they pick the title shown in `/city` output
//! and the art asset attached to it. Boundaries are inclusive-low /
//! exclusive-high except the open-ended top tier.

use serde::{Deserialize, Serialize};

/// The five development stages of a civilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CityTier {
    /// Fewer than 10 bricks.
    Camp,
    /// 10 to 49 bricks.
    Village,
    /// 50 to 99 bricks.
    Town,
    /// 100 to 499 bricks.
    City,
    /// 500 bricks or more.
    Kingdom,
}

impl CityTier {
    /// Classify a brick balance into its tier.
    pub const fn from_bricks(bricks: i64) -> Self {
        if bricks < 10 {
            Self::Camp
        } else if bricks < 50 {
            Self::Village
        } else if bricks < 100 {
            Self::Town
        } else if bricks < 500 {
            Self::City
        } else {
            Self::Kingdom
        }
    }

    /// User-facing title, emoji included.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Camp => "⛺ Camp",
            Self::Village => "🛖 Village",
            Self::Town => "🏠 Town",
            Self::City => "🏙️ City",
            Self::Kingdom => "🏰 Kingdom",
        }
    }

    /// Art asset file name for this tier.
    ///
    /// Only four assets exist; City and Kingdom share one.
    pub const fn art_file(self) -> &'static str {
        match self {
            Self::Camp => "Camp.jpg",
            Self::Village => "Village.jpg",
            Self::Town => "Town.jpg",
            Self::City | Self::Kingdom => "City.jpg",
        }
    }
}
