use crate::{config::App, model::ModelManager};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    settings: &'static App,
}

impl AppState {
    pub fn new(mm: ModelManager, settings: &'static App) -> Self {
        Self { mm, settings }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    /// Session secret and lifetime.
    pub fn settings(&self) -> &'static App {
        self.settings
    }
}
