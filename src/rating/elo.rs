//! Elo rating engine with an adaptive K-factor and category-banded scores
//!
//! Ratings move with the classic Elo rule from the skillratings crate. Each
//! side of a comparison uses its own K-factor, taken from its experience
//! before the update. The human-facing visible score is derived from the
//! rating but clamped to the band of the item's category, so a "good" movie
//! always shows above an "okay" one no matter how the ratings drift.

use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;
use tracing::{debug, warn};

use crate::config::RatingConfig;
use crate::types::{Category, Item, OutcomeSummary, RatingChange};
use crate::utils::round_to_tenth;

/// Rating every item starts from before its category is known
pub const DEFAULT_RATING: f64 = 1400.0;

/// Rating points per visible-score point
pub const RATING_SCALE: f64 = 400.0;

/// Probability that a side rated `rating_a` beats a side rated `rating_b`.
///
/// `expected_score(a, b) + expected_score(b, a) == 1`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Rating a freshly categorised item is seeded with
pub fn seed_rating(category: Category) -> f64 {
    match category {
        Category::Good => 1500.0,
        Category::Okay => 1400.0,
        Category::Bad => 1300.0,
        Category::Unset => DEFAULT_RATING,
    }
}

/// Visible score at the default rating
fn base_score(category: Category) -> f64 {
    match category {
        Category::Good => 8.5,
        Category::Okay => 6.0,
        Category::Bad => 3.0,
        Category::Unset => 6.0,
    }
}

/// Inclusive visible-score band of a category
pub fn score_band(category: Category) -> (f64, f64) {
    match category {
        Category::Good => (8.0, 9.9),
        Category::Okay => (5.0, 8.0),
        Category::Bad | Category::Unset => (1.0, 5.0),
    }
}

/// Visible score for a rating within a category, rounded to one decimal.
pub fn visible_score_for(rating: f64, category: Category) -> f64 {
    let adjustment = (rating - DEFAULT_RATING) / RATING_SCALE;
    let (low, high) = score_band(category);
    round_to_tenth((base_score(category) + adjustment).clamp(low, high))
}

/// Elo rating engine
///
/// Holds only its configuration; items are passed in per call and never
/// retained.
#[derive(Debug, Clone, Default)]
pub struct EloRatingEngine {
    config: RatingConfig,
}

impl EloRatingEngine {
    /// Create a new engine with a validated K-factor schedule
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Expected score of `rating_a` against `rating_b`
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        expected_score(rating_a, rating_b)
    }

    /// K-factor for an item given how many comparisons it has played so far
    pub fn k_factor(&self, item: &Item) -> u32 {
        self.k_factor_for_games(item.games_played)
    }

    pub fn k_factor_for_games(&self, games_played: u32) -> u32 {
        if games_played < self.config.provisional_games {
            self.config.provisional_k
        } else if games_played < self.config.stable_games {
            self.config.standard_k
        } else {
            self.config.stable_k
        }
    }

    /// Visible score of an item from its current rating and category
    pub fn visible_score(&self, item: &Item) -> f64 {
        visible_score_for(item.rating, item.category)
    }

    /// Create an item for a freshly categorised movie.
    ///
    /// The rating is seeded from the category and the visible score is
    /// computed immediately.
    pub fn create_item(&self, title: impl Into<String>, category: Category) -> Item {
        let mut item = Item::new(title, category);
        item.rating = seed_rating(category);
        item.visible_score = self.visible_score(&item);
        item
    }

    /// Bring a loaded record back in line with the engine's invariants.
    ///
    /// A non-finite rating is reseeded from the category, `games_played`
    /// is set to `wins + losses` and the visible score is recomputed.
    /// Returns `true` if anything other than the visible score changed.
    pub fn normalize_item(&self, item: &mut Item) -> bool {
        let mut repaired = false;

        if !item.rating.is_finite() {
            warn!(
                "Movie '{}' has invalid rating {}, reseeding from category {}",
                item.title, item.rating, item.category
            );
            item.rating = seed_rating(item.category);
            repaired = true;
        }

        let played = item.wins + item.losses;
        if item.games_played != played {
            warn!(
                "Movie '{}' records {} games but {} wins and {} losses, using {}",
                item.title, item.games_played, item.wins, item.losses, played
            );
            item.games_played = played;
            repaired = true;
        }

        item.visible_score = self.visible_score(item);
        repaired
    }

    /// Apply the outcome of one comparison to both items.
    ///
    /// Expected scores and K-factors are taken from the state before the
    /// update. Panics if both arguments are the same item or an item's
    /// counters are inconsistent.
    pub fn apply_outcome(&self, item_a: &mut Item, item_b: &mut Item, a_wins: bool) -> OutcomeSummary {
        assert_ne!(item_a.id, item_b.id, "an item cannot be compared with itself");
        assert_eq!(item_a.wins + item_a.losses, item_a.games_played);
        assert_eq!(item_b.wins + item_b.losses, item_b.games_played);

        let rating_a = EloRating { rating: item_a.rating };
        let rating_b = EloRating { rating: item_b.rating };
        let expected_a = self.expected_score(item_a.rating, item_b.rating);

        let k_a = self.k_factor(item_a);
        let k_b = self.k_factor(item_b);

        let outcome = if a_wins { Outcomes::WIN } else { Outcomes::LOSS };

        // Each side moves with its own K, so run the update once per side.
        let (new_a, _) = elo(&rating_a, &rating_b, &outcome, &EloConfig { k: f64::from(k_a) });
        let (_, new_b) = elo(&rating_a, &rating_b, &outcome, &EloConfig { k: f64::from(k_b) });

        let change_a = self.update_item(item_a, new_a.rating, k_a, a_wins);
        let change_b = self.update_item(item_b, new_b.rating, k_b, !a_wins);

        debug!(
            "Applied outcome: '{}' {:.1} -> {:.1} (k={}), '{}' {:.1} -> {:.1} (k={})",
            item_a.title,
            change_a.old_rating,
            change_a.new_rating,
            k_a,
            item_b.title,
            change_b.old_rating,
            change_b.new_rating,
            k_b
        );

        if a_wins {
            OutcomeSummary {
                winner: change_a,
                loser: change_b,
                winner_expected_score: expected_a,
            }
        } else {
            OutcomeSummary {
                winner: change_b,
                loser: change_a,
                winner_expected_score: 1.0 - expected_a,
            }
        }
    }

    fn update_item(&self, item: &mut Item, new_rating: f64, k_factor: u32, won: bool) -> RatingChange {
        let old_rating = item.rating;
        let old_visible_score = item.visible_score;

        item.rating = new_rating;
        item.games_played += 1;
        if won {
            item.wins += 1;
        } else {
            item.losses += 1;
        }
        item.visible_score = self.visible_score(item);

        RatingChange {
            item_id: item.id,
            old_rating,
            new_rating,
            k_factor,
            old_visible_score,
            new_visible_score: item.visible_score,
        }
    }
}
