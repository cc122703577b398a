use std::collections::BTreeMap;

use crate::models::{
    CompatibilityResult, Factor, Game, PlayerPreferences, Recommendation, Verdict,
};

/// Scores how well a game fits a player's stated preferences
///
/// Each of the four factors contributes 1.0 when satisfied, 0.5 when the player has no
/// preference on it, and 0.0 when violated. The score is the mean of the four, and a game
/// is recommended at 0.75 or above. Inputs are assumed to be validated already.
pub struct CompatibilityEngine;

impl CompatibilityEngine {
    pub fn score(game: &Game, preferences: &PlayerPreferences) -> CompatibilityResult {
        let details: BTreeMap<Factor, Verdict> = Factor::ALL
            .into_iter()
            .map(|factor| (factor, Self::evaluate(factor, game, preferences)))
            .collect();

        let total: f64 = details.values().map(|verdict| verdict.weight()).sum();
        let compatibility_score = total / Factor::ALL.len() as f64;

        CompatibilityResult {
            game_id: game.id,
            player_id: preferences.player_id,
            compatibility_score,
            recommendation: Recommendation::from_score(compatibility_score),
            details,
        }
    }

    fn evaluate(factor: Factor, game: &Game, preferences: &PlayerPreferences) -> Verdict {
        match factor {
            Factor::PlayerCount => match preferences.preferred_player_count {
                Some(count) => verdict(game.supports_player_count(count)),
                None => Verdict::NoPreference,
            },
            Factor::PlayTime => within_bounds(
                preferences.minimum_play_time,
                preferences.maximum_play_time,
                game.average_play_time,
            ),
            Factor::Complexity => within_bounds(
                preferences.preferred_complexity_min,
                preferences.preferred_complexity_max,
                game.complexity_rating,
            ),
            Factor::Categories => {
                if preferences.preferred_category_ids.is_empty() {
                    Verdict::NoPreference
                } else {
                    verdict(
                        !game
                            .category_ids
                            .is_disjoint(&preferences.preferred_category_ids),
                    )
                }
            }
        }
    }
}

fn verdict(compatible: bool) -> Verdict {
    if compatible {
        Verdict::Compatible
    } else {
        Verdict::Incompatible
    }
}

/// Range factors are only judged when both bounds are set
fn within_bounds<T: PartialOrd>(min: Option<T>, max: Option<T>, value: T) -> Verdict {
    match (min, max) {
        (Some(min), Some(max)) => verdict(min <= value && value <= max),
        _ => Verdict::NoPreference,
    }
}
