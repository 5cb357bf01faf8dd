use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::models::GameState;
use crate::services::game_service::GameService;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq)]
pub struct GameStateEvent {
    pub game: String,
    pub state: GameState,
}

/// Background poll of the visible game's installation and runtime state.
///
/// Only the visible game page is polled; when no game page is visible the
/// tick is skipped entirely. An event is emitted only when the observed
/// state differs from the last one (the first observation always counts as
/// a change).
#[derive(Clone)]
pub struct GameStateMonitor {
    games: GameService,
    states: Arc<Mutex<HashMap<String, GameState>>>,
    visible: Arc<Mutex<Option<String>>>,
    polling: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl GameStateMonitor {
    pub fn new(games: GameService) -> Self {
        Self::with_interval(games, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(games: GameService, poll_interval: Duration) -> Self {
        Self {
            games,
            states: Arc::new(Mutex::new(HashMap::new())),
            visible: Arc::new(Mutex::new(None)),
            polling: Arc::new(AtomicBool::new(false)),
            poll_interval,
        }
    }

    /// Sets which game page is currently visible, or `None` when the user
    /// navigated away from all game pages.
    pub fn set_visible(&self, game: Option<&str>) {
        *lock(&self.visible) = game.map(str::to_string);
    }

    /// Last observed state for a game, if it has been polled at least once.
    pub fn state(&self, game: &str) -> Option<GameState> {
        lock(&self.states).get(game).cloned()
    }

    /// Starts the poll loop and returns the event stream. Returns `None` if
    /// the monitor is already running; the loop ends when `stop` is called
    /// or the receiver is dropped.
    pub fn start(&self) -> Option<mpsc::UnboundedReceiver<GameStateEvent>> {
        if self.polling.swap(true, Ordering::SeqCst) {
            tracing::debug!("state monitor already polling");
            return None;
        }
        tracing::info!(interval = ?self.poll_interval, "state monitor started");

        let (tx, rx) = mpsc::unbounded_channel();
        let monitor = self.clone();
        tokio::spawn(async move {
            while monitor.polling.load(Ordering::SeqCst) {
                let visible = lock(&monitor.visible).clone();
                if let Some(game) = visible {
                    if let Some(event) = monitor.observe(&game).await {
                        if tx.send(event).is_err() {
                            monitor.polling.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                }
                sleep(monitor.poll_interval).await;
            }
            tracing::info!("state monitor stopped");
        });
        Some(rx)
    }

    pub fn stop(&self) {
        self.polling.store(false, Ordering::SeqCst);
    }

    async fn observe(&self, game: &str) -> Option<GameStateEvent> {
        let state = match self.games.game_state(game).await {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(game, %error, "failed to poll game state");
                return None;
            }
        };

        let mut states = lock(&self.states);
        if states.get(game) == Some(&state) {
            return None;
        }
        states.insert(game.to_string(), state.clone());
        Some(GameStateEvent {
            game: game.to_string(),
            state,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::errors::Result;
    use crate::executor::{commands, CommandExecutor};
    use crate::games::{GameCatalog, GameConfig};
    use crate::models::InstallStatus;
    use crate::services::progress_tracker::{ProgressTracker, TrackerConfig};
    use crate::services::property_service::PropertyService;

    #[derive(Default)]
    struct ToggleExecutor {
        installed: AtomicBool,
        running: AtomicBool,
    }

    #[async_trait]
    impl CommandExecutor for ToggleExecutor {
        async fn execute(&self, command: &str, args: Value) -> Result<Value> {
            match command {
                commands::GET_GAME_PROPERTY => {
                    let suffix = args["suffix"].as_str().unwrap_or_default();
                    if suffix == "is-installed" && self.installed.load(Ordering::SeqCst) {
                        Ok(Value::String("true".to_string()))
                    } else {
                        Ok(Value::Null)
                    }
                }
                commands::IS_GAME_RUNNING => {
                    Ok(Value::Bool(self.running.load(Ordering::SeqCst)))
                }
                other => panic!("unexpected command: {other}"),
            }
        }
    }

    fn monitor(executor: Arc<ToggleExecutor>) -> GameStateMonitor {
        let catalog = Arc::new(GameCatalog::new(vec![GameConfig {
            id: "bo3".to_string(),
            ui_id: "boiii".to_string(),
            display_name: "Black Ops 3".to_string(),
            code_name: "BOIII".to_string(),
            default_install_dir: "bo3_game_files".to_string(),
            modes: Vec::new(),
            special_settings: Vec::new(),
        }]));
        let games = GameService::new(
            executor.clone(),
            catalog,
            PropertyService::new(executor.clone()),
            ProgressTracker::with_config(executor, TrackerConfig::default()),
        );
        GameStateMonitor::with_interval(games, Duration::from_millis(2))
    }

    #[tokio::test]
    async fn emits_only_on_state_change() {
        let executor = Arc::new(ToggleExecutor::default());
        let monitor = monitor(executor.clone());
        monitor.set_visible(Some("bo3"));

        let mut events = monitor.start().unwrap();

        let first = events.recv().await.unwrap();
        assert_eq!(first.game, "bo3");
        assert_eq!(first.state.install_status, InstallStatus::NotSetup);
        assert!(!first.state.is_running);

        executor.installed.store(true, Ordering::SeqCst);
        executor.running.store(true, Ordering::SeqCst);

        let second = events.recv().await.unwrap();
        assert_eq!(second.state.install_status, InstallStatus::Installed);
        assert!(second.state.is_running);

        // stable state produces no further events
        sleep(Duration::from_millis(20)).await;
        assert!(events.try_recv().is_err());

        monitor.stop();
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let executor = Arc::new(ToggleExecutor::default());
        let monitor = monitor(executor);

        let _events = monitor.start().unwrap();
        assert!(monitor.start().is_none());
        monitor.stop();
    }

    #[tokio::test]
    async fn skips_polling_with_no_visible_game() {
        let executor = Arc::new(ToggleExecutor::default());
        let monitor = monitor(executor);

        let mut events = monitor.start().unwrap();
        sleep(Duration::from_millis(20)).await;
        assert!(events.try_recv().is_err());
        assert!(monitor.state("bo3").is_none());

        monitor.stop();
    }
}
