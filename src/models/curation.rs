use serde::{Deserialize, Serialize};

use super::{Game, GameQuery};

/// Averages over the games the real players have played
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedGameStats {
    pub games: Vec<Game>,
    pub mean_min_players: f64,
    pub mean_max_players: f64,
    pub mean_play_time: f64,
    pub mean_complexity: f64,
}

impl PlayedGameStats {
    /// Computes the means, or `None` when nothing has been played
    pub fn from_games(games: Vec<Game>) -> Option<Self> {
        if games.is_empty() {
            return None;
        }

        let count = games.len() as f64;
        let mean = |attr: fn(&Game) -> f64| games.iter().map(attr).sum::<f64>() / count;

        let mean_min_players = mean(|g| g.min_players as f64);
        let mean_max_players = mean(|g| g.max_players as f64);
        let mean_play_time = mean(|g| g.average_play_time as f64);
        let mean_complexity = mean(|g| g.complexity_rating);

        Some(Self {
            games,
            mean_min_players,
            mean_max_players,
            mean_play_time,
            mean_complexity,
        })
    }

    pub fn played_count(&self) -> usize {
        self.games.len()
    }
}

/// Attribute bounds a game must fall within to count as similar to the played set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWindow {
    /// Lower bound on a candidate's `min_players`
    pub min_players: i32,
    /// Upper bound on a candidate's `max_players`
    pub max_players: i32,
    pub min_play_time: i32,
    pub max_play_time: i32,
    pub min_complexity: f64,
    pub max_complexity: f64,
}

impl SimilarityWindow {
    /// Whether all five bounds hold for `game`
    pub fn contains(&self, game: &Game) -> bool {
        game.min_players >= self.min_players
            && game.max_players <= self.max_players
            && game.average_play_time >= self.min_play_time
            && game.average_play_time <= self.max_play_time
            && game.complexity_rating >= self.min_complexity
            && game.complexity_rating <= self.max_complexity
    }
}

/// Loose catalog filter used when there is no play history to anchor on
///
/// Player bounds match on overlap: a game qualifies when some count in
/// `min_players..=max_players` is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericFilter {
    pub min_players: i32,
    pub max_players: i32,
    pub min_play_time: i32,
    pub max_play_time: i32,
}

impl Default for GenericFilter {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 6,
            min_play_time: 30,
            max_play_time: 120,
        }
    }
}

impl GenericFilter {
    pub fn matches(&self, game: &Game) -> bool {
        GameQuery::from(*self).matches(game)
    }
}

/// Size estimate for the curated library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedCount {
    pub played_games: usize,
    pub similar_games: usize,
    pub total_curated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_of_empty_set_is_none() {
        assert!(PlayedGameStats::from_games(vec![]).is_none());
    }

    #[test]
    fn test_stats_means() {
        let stats = PlayedGameStats::from_games(vec![
            Game::new("A", 2, 4, 60, 2.0),
            Game::new("B", 3, 6, 90, 3.0),
        ])
        .unwrap();

        assert_eq!(stats.played_count(), 2);
        assert_eq!(stats.mean_min_players, 2.5);
        assert_eq!(stats.mean_max_players, 5.0);
        assert_eq!(stats.mean_play_time, 75.0);
        assert_eq!(stats.mean_complexity, 2.5);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = SimilarityWindow {
            min_players: 2,
            max_players: 5,
            min_play_time: 30,
            max_play_time: 120,
            min_complexity: 1.5,
            max_complexity: 3.5,
        };

        assert!(window.contains(&Game::new("Edge", 2, 5, 30, 1.5)));
        assert!(window.contains(&Game::new("Other edge", 2, 5, 120, 3.5)));
        assert!(!window.contains(&Game::new("Solo", 1, 4, 60, 2.0)));
        assert!(!window.contains(&Game::new("Party", 3, 8, 60, 2.0)));
        assert!(!window.contains(&Game::new("Long", 2, 4, 180, 2.0)));
        assert!(!window.contains(&Game::new("Heavy", 2, 4, 60, 4.0)));
    }

    #[test]
    fn test_generic_filter_matches_on_player_overlap() {
        let filter = GenericFilter::default();
        assert!(filter.matches(&Game::new("Solo friendly", 1, 4, 45, 2.0)));
        assert!(filter.matches(&Game::new("Party", 5, 10, 30, 1.0)));
        assert!(!filter.matches(&Game::new("Solo only", 1, 1, 45, 2.0)));
        assert!(!filter.matches(&Game::new("Big party", 8, 10, 45, 1.0)));
        assert!(!filter.matches(&Game::new("Filler", 2, 4, 15, 1.0)));
        assert!(!filter.matches(&Game::new("Epic", 2, 4, 180, 4.0)));
    }
}
