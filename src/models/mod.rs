pub mod compatibility;
pub mod curation;
pub mod game;
pub mod game_query;
pub mod player;
pub mod player_preferences;

pub use compatibility::{CompatibilityResult, Factor, Recommendation, Verdict};
pub use curation::{CuratedCount, GenericFilter, PlayedGameStats, SimilarityWindow};
pub use game::{Category, Game};
pub use game_query::GameQuery;
pub use player::{PlayRecord, Player};
pub use player_preferences::{PlayerPreferences, PreferencesUpdate};
