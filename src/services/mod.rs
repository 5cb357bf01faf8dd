pub mod game_service;
pub mod progress_tracker;
pub mod property_service;
pub mod setup_service;
pub mod state_monitor;

pub use game_service::GameService;
pub use progress_tracker::{
    CompletionHook, ProgressSink, ProgressTracker, TrackRequest, TrackerConfig,
};
pub use property_service::PropertyService;
pub use setup_service::SetupService;
pub use state_monitor::{GameStateEvent, GameStateMonitor};
