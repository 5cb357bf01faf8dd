pub mod errors;
pub mod executor;
pub mod games;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

pub use errors::{LauncherError, Result};
pub use executor::{commands, CommandExecutor};
pub use games::{GameCatalog, GameConfig, GameMode};
pub use models::{
    ComponentEntry, ComponentInfo, GameState, InstallStatus, OperationStatus, ProgressSnapshot,
    SessionInfo, SpaceInfo, TrackOutcome,
};
pub use services::{
    CompletionHook, GameService, GameStateEvent, GameStateMonitor, ProgressSink, ProgressTracker,
    PropertyService, SetupService, TrackRequest, TrackerConfig,
};

/// Everything the embedding shell needs, wired around one command executor.
/// All members are cheap clones sharing the same executor and tracker, so
/// the single-operation guarantee holds across services.
#[derive(Clone)]
pub struct Launcher {
    pub catalog: Arc<GameCatalog>,
    pub properties: PropertyService,
    pub tracker: ProgressTracker,
    pub games: GameService,
    pub setup: SetupService,
    pub monitor: GameStateMonitor,
}

impl Launcher {
    pub fn new(executor: Arc<dyn CommandExecutor>, catalog: GameCatalog) -> Self {
        Self::with_tracker_config(executor, catalog, TrackerConfig::default())
    }

    pub fn with_tracker_config(
        executor: Arc<dyn CommandExecutor>,
        catalog: GameCatalog,
        config: TrackerConfig,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let properties = PropertyService::new(executor.clone());
        let tracker = ProgressTracker::with_config(executor.clone(), config);
        let games = GameService::new(
            executor.clone(),
            catalog.clone(),
            properties.clone(),
            tracker.clone(),
        );
        let setup = SetupService::new(executor, catalog.clone(), tracker.clone());
        let monitor = GameStateMonitor::new(games.clone());
        Self {
            catalog,
            properties,
            tracker,
            games,
            setup,
            monitor,
        }
    }
}
