use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score at or above which a game is recommended
pub const RECOMMENDATION_THRESHOLD: f64 = 0.75;

/// One independently scored dimension of game/player fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    PlayerCount,
    PlayTime,
    Complexity,
    Categories,
}

impl Factor {
    /// All factors, in scoring order
    pub const ALL: [Factor; 4] = [
        Factor::PlayerCount,
        Factor::PlayTime,
        Factor::Complexity,
        Factor::Categories,
    ];
}

/// Outcome of evaluating a single factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Compatible,
    Incompatible,
    /// The player left this dimension unset
    NoPreference,
}

impl Verdict {
    /// Partial score this verdict contributes
    pub fn weight(self) -> f64 {
        match self {
            Verdict::Compatible => 1.0,
            Verdict::NoPreference => 0.5,
            Verdict::Incompatible => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    NotRecommended,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= RECOMMENDATION_THRESHOLD {
            Recommendation::Recommended
        } else {
            Recommendation::NotRecommended
        }
    }
}

/// Compatibility between one game and one player's preferences
///
/// Computed per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityResult {
    pub game_id: Uuid,
    pub player_id: Uuid,
    /// Mean of the factor weights, always a multiple of 0.125 in [0.0, 1.0]
    pub compatibility_score: f64,
    pub recommendation: Recommendation,
    /// Verdict for each of the four factors
    pub details: BTreeMap<Factor, Verdict>,
}

impl CompatibilityResult {
    pub fn verdict(&self, factor: Factor) -> Option<Verdict> {
        self.details.get(&factor).copied()
    }
}
