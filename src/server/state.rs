//! Shared application state.

use super::config::ServerConfig;
use crate::deck::DeckGenerator;
use std::sync::Arc;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DeckGenerator>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_generator(DeckGenerator::new(
            config.resources.dir.clone(),
            config.resources.template_maps.clone(),
            config.export_settings(),
        ))
    }

    pub fn with_generator(generator: DeckGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}
