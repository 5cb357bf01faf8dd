use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::{LauncherError, Result};
use crate::executor::{commands, CommandExecutor};
use crate::games::{GameCatalog, GameMode};
use crate::models::{GameState, InstallStatus, TrackOutcome};
use crate::services::progress_tracker::{CompletionHook, ProgressSink, ProgressTracker, TrackRequest};
use crate::services::property_service::{keys, PropertyService};

/// High-level game operations. Long-running ones go through the progress
/// tracker; `stop` and `is_running` are plain round trips.
#[derive(Clone)]
pub struct GameService {
    executor: Arc<dyn CommandExecutor>,
    catalog: Arc<GameCatalog>,
    properties: PropertyService,
    tracker: ProgressTracker,
}

impl GameService {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        catalog: Arc<GameCatalog>,
        properties: PropertyService,
        tracker: ProgressTracker,
    ) -> Self {
        Self {
            executor,
            catalog,
            properties,
            tracker,
        }
    }

    /// Launches a game, optionally in a specific mode. Fails up front when
    /// the game is unknown or no install path has been configured, so the
    /// backend is never asked to launch from nowhere.
    pub async fn launch(
        &self,
        game: &str,
        mode: Option<GameMode>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<TrackOutcome> {
        let config = self
            .catalog
            .get(game)
            .ok_or_else(|| LauncherError::NotFound(format!("game configuration for {game}")))?;

        let install_path = self.properties.game_property(game, keys::INSTALL).await?;
        if install_path.is_none() {
            return Err(LauncherError::Config(format!(
                "{} installation path not configured",
                config.display_name
            )));
        }

        let mut args = json!({ "game": game });
        if let Some(mode) = mode {
            args["mode"] = Value::String(mode.as_str().to_string());
        }

        let request = TrackRequest::new(commands::LAUNCH_GAME, config.ui_id.clone())
            .args(args)
            .messages(
                format!("Launching {}...", config.display_name),
                "Launch complete!",
            );
        self.tracker.track(request, sink, None).await
    }

    /// Verifies game files, downloading anything missing or corrupt. Also
    /// serves as the download step of the setup flow. `on_complete` runs
    /// once after the terminal snapshot, before the sink is hidden; callers
    /// use it to refresh installation state.
    pub async fn verify(
        &self,
        game: &str,
        sink: Arc<dyn ProgressSink>,
        on_complete: Option<CompletionHook>,
    ) -> Result<TrackOutcome> {
        let request = TrackRequest::new(commands::VERIFY_GAME, self.catalog.ui_id(game).to_string())
            .args(json!({ "game": game }))
            .messages(
                format!("Verifying {}...", self.catalog.display_name(game)),
                "Verification complete!",
            );
        self.tracker.track(request, sink, on_complete).await
    }

    pub async fn unlock_all(&self, game: &str, sink: Arc<dyn ProgressSink>) -> Result<TrackOutcome> {
        let request = TrackRequest::new(commands::UNLOCK_ALL, self.catalog.ui_id(game).to_string())
            .args(json!({ "game": game }))
            .messages(
                format!("Unlocking all for {}...", self.catalog.display_name(game)),
                "Unlock all complete!",
            );
        self.tracker.track(request, sink, None).await
    }

    /// Deletes game files; install path and preferences survive.
    pub async fn uninstall(
        &self,
        game: &str,
        sink: Arc<dyn ProgressSink>,
        on_complete: Option<CompletionHook>,
    ) -> Result<TrackOutcome> {
        let request = TrackRequest::new(commands::DELETE_GAME, self.catalog.ui_id(game).to_string())
            .args(json!({ "game": game }))
            .messages(
                format!("Uninstalling {}...", self.catalog.display_name(game)),
                "Uninstall complete!",
            );
        self.tracker.track(request, sink, on_complete).await
    }

    pub async fn stop(&self, game: &str) -> Result<()> {
        self.executor
            .execute(commands::STOP_GAME, json!({ "game": game }))
            .await?;
        Ok(())
    }

    /// Older backends answer with the string `"true"` instead of a boolean.
    pub async fn is_running(&self, game: &str) -> Result<bool> {
        let value = self
            .executor
            .execute(commands::IS_GAME_RUNNING, json!({ "game": game }))
            .await?;
        Ok(match value {
            Value::Bool(flag) => flag,
            Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    pub async fn game_state(&self, game: &str) -> Result<GameState> {
        let install_status = self.properties.installation_status(game).await;
        let is_running = self.is_running(game).await.unwrap_or(false);
        Ok(GameState {
            install_status,
            is_running,
            has_any_setup: install_status != InstallStatus::NotSetup,
        })
    }

    pub fn cancel_active_operation(&self) -> bool {
        self.tracker.cancel_active()
    }
}
