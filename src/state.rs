use std::sync::Arc;

use crate::{
    db::InMemoryCatalog,
    services::{
        catalog::{GameCatalog, PlayerStore, PreferenceStore},
        curation::{CurationConfig, CurationSelector},
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn GameCatalog>,
    pub players: Arc<dyn PlayerStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub curation: Arc<CurationSelector>,
}

impl AppState {
    /// State over one backend serving every store
    pub fn new<S>(store: Arc<S>, curation_config: CurationConfig) -> Self
    where
        S: GameCatalog + PlayerStore + PreferenceStore + 'static,
    {
        let catalog: Arc<dyn GameCatalog> = store.clone();
        let curation = Arc::new(CurationSelector::new(catalog.clone(), curation_config));
        Self {
            catalog,
            players: store.clone(),
            preferences: store,
            curation,
        }
    }

    pub fn in_memory(catalog: InMemoryCatalog, curation_config: CurationConfig) -> Self {
        Self::new(Arc::new(catalog), curation_config)
    }
}
