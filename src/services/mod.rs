pub mod catalog;
pub mod compatibility;
pub mod curation;

pub use catalog::{GameCatalog, PlayerStore, PreferenceStore};
pub use compatibility::CompatibilityEngine;
pub use curation::{CurationConfig, CurationSelector};
