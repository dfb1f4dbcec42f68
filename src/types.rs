//! Common types used throughout the movie ranker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::RankingError;
use crate::utils::{current_timestamp, generate_item_id};

/// Stable identifier for a ranked item, assigned once at creation
pub type ItemId = Uuid;

/// Human-assigned qualitative bucket for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Good,
    Okay,
    Bad,
    #[default]
    Unset,
}

impl Category {
    /// Display precedence: higher ranks list first when visible scores tie
    pub fn rank(&self) -> u8 {
        match self {
            Category::Good => 2,
            Category::Okay => 1,
            Category::Bad | Category::Unset => 0,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Good => write!(f, "good"),
            Category::Okay => write!(f, "okay"),
            Category::Bad => write!(f, "bad"),
            Category::Unset => write!(f, "unset"),
        }
    }
}

impl FromStr for Category {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(Category::Good),
            "okay" => Ok(Category::Okay),
            "bad" => Ok(Category::Bad),
            "unset" | "" => Ok(Category::Unset),
            other => Err(RankingError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// A ranked movie
///
/// `rating`, the counters and `visible_score` are only ever written by the
/// rating engine. `games_played == wins + losses` holds at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "generate_item_id")]
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub visible_score: f64,
    #[serde(default = "current_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_rating() -> f64 {
    crate::rating::DEFAULT_RATING
}

impl Item {
    /// Create an item with no comparison history.
    ///
    /// The rating starts at the default and the visible score is left at
    /// zero; use [`crate::rating::EloRatingEngine::create_item`] to get a
    /// seeded, scored item.
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            id: generate_item_id(),
            title: title.into(),
            category,
            rating: default_rating(),
            wins: 0,
            losses: 0,
            games_played: 0,
            visible_score: 0.0,
            created_at: current_timestamp(),
        }
    }
}

/// Rating change of one side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub item_id: ItemId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub k_factor: u32,
    pub old_visible_score: f64,
    pub new_visible_score: f64,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Result of applying one comparison outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub winner: RatingChange,
    pub loser: RatingChange,
    /// Probability the winner was expected to win before the update
    pub winner_expected_score: f64,
}
