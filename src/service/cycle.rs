//! Comparison cycle state machine
//!
//! One cycle takes a newly added movie from creation to a resolved
//! comparison:
//!
//! `NewItemCreated -> CategoryAssigned -> OpponentSelected -> OutcomeReported -> Idle`
//!
//! When no opponent exists the cycle ends straight after `CategoryAssigned`.
//! The new item is always carried explicitly by id, never inferred from
//! its position in the collection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RankingError;
use crate::types::ItemId;

/// Where the current comparison cycle stands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CycleState {
    #[default]
    Idle,
    /// A title was picked but has no category yet
    NewItemCreated { title: String },
    /// The item is rated and stored; no opponent chosen yet
    CategoryAssigned { item: ItemId },
    /// Waiting for the human to pick the better movie
    OpponentSelected { item: ItemId, opponent: ItemId },
    /// The outcome is known and being applied
    OutcomeReported {
        item: ItemId,
        opponent: ItemId,
        new_item_won: bool,
    },
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleState::Idle => write!(f, "Idle"),
            CycleState::NewItemCreated { .. } => write!(f, "NewItemCreated"),
            CycleState::CategoryAssigned { .. } => write!(f, "CategoryAssigned"),
            CycleState::OpponentSelected { .. } => write!(f, "OpponentSelected"),
            CycleState::OutcomeReported { .. } => write!(f, "OutcomeReported"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonCycle {
    state: CycleState,
}

impl ComparisonCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CycleState::Idle
    }

    /// Title waiting for a category, if any
    pub fn pending_title(&self) -> Option<&str> {
        match &self.state {
            CycleState::NewItemCreated { title } => Some(title.as_str()),
            _ => None,
        }
    }

    /// `(new item, opponent)` waiting for an outcome, if any
    pub fn pending_comparison(&self) -> Option<(ItemId, ItemId)> {
        match self.state {
            CycleState::OpponentSelected { item, opponent } => Some((item, opponent)),
            _ => None,
        }
    }

    /// Start a new cycle for `title`.
    ///
    /// Picking a new title abandons whatever the previous cycle was waiting
    /// for; items already stored are unaffected.
    pub fn start(&mut self, title: impl Into<String>) {
        if !self.is_idle() {
            debug!("Abandoning comparison cycle in state {}", self.state);
        }
        self.state = CycleState::NewItemCreated {
            title: title.into(),
        };
    }

    pub fn category_assigned(&mut self, item: ItemId) -> crate::error::Result<()> {
        match self.state {
            CycleState::NewItemCreated { .. } => {
                self.state = CycleState::CategoryAssigned { item };
                Ok(())
            }
            _ => Err(self.invalid("assign a category")),
        }
    }

    pub fn opponent_selected(&mut self, opponent: ItemId) -> crate::error::Result<()> {
        match self.state {
            CycleState::CategoryAssigned { item } => {
                self.state = CycleState::OpponentSelected { item, opponent };
                Ok(())
            }
            _ => Err(self.invalid("select an opponent")),
        }
    }

    /// Record the human's choice and return `(new item, opponent)`
    pub fn outcome_reported(&mut self, new_item_won: bool) -> crate::error::Result<(ItemId, ItemId)> {
        match self.state {
            CycleState::OpponentSelected { item, opponent } => {
                self.state = CycleState::OutcomeReported {
                    item,
                    opponent,
                    new_item_won,
                };
                Ok((item, opponent))
            }
            _ => Err(self.invalid("report an outcome")),
        }
    }

    /// Close the cycle. Valid after a category was assigned without an
    /// opponent, or after an outcome was reported.
    pub fn finish(&mut self) -> crate::error::Result<()> {
        match self.state {
            CycleState::CategoryAssigned { .. } | CycleState::OutcomeReported { .. } => {
                self.state = CycleState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("finish the cycle")),
        }
    }

    /// Drop any pending work and return to idle
    pub fn reset(&mut self) {
        self.state = CycleState::Idle;
    }

    fn invalid(&self, action: &str) -> anyhow::Error {
        RankingError::InvalidState {
            message: format!("cannot {} while {}", action, self.state),
        }
        .into()
    }
}
