use depot_core::backend::InventoryBackend;
use depot_core::config::Config;
use depot_core::screen::MovementsScreen;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state passed to all route handlers.
///
/// The movements screen is one view-model shared by every client of this
/// server. Handlers lock it only around local work, never across a backend
/// call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn InventoryBackend>,
    pub screen: Arc<Mutex<MovementsScreen>>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn InventoryBackend>) -> Self {
        let screen = MovementsScreen::from_config(&config.dashboard);
        Self {
            config: Arc::new(config),
            backend,
            screen: Arc::new(Mutex::new(screen)),
        }
    }

    pub fn lock_screen(&self) -> anyhow::Result<MutexGuard<'_, MovementsScreen>> {
        self.screen
            .lock()
            .map_err(|_| anyhow::anyhow!("movements screen lock poisoned"))
    }
}
