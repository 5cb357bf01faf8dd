use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::{LauncherError, Result};
use crate::executor::{commands, CommandExecutor};
use crate::games::GameCatalog;
use crate::models::{ComponentInfo, SpaceInfo, TrackOutcome};
use crate::services::progress_tracker::{CompletionHook, ProgressSink, ProgressTracker, TrackRequest};

/// Setup-flow plumbing: folder selection, component choices, disk space
/// checks, and the initial download.
#[derive(Clone)]
pub struct SetupService {
    executor: Arc<dyn CommandExecutor>,
    catalog: Arc<GameCatalog>,
    tracker: ProgressTracker,
}

impl SetupService {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        catalog: Arc<GameCatalog>,
        tracker: ProgressTracker,
    ) -> Self {
        Self {
            executor,
            catalog,
            tracker,
        }
    }

    /// Opens the host's folder picker. `None` when the user dismissed it.
    pub async fn browse_folder(&self) -> Result<Option<String>> {
        let value = self
            .executor
            .execute(commands::BROWSE_FOLDER, Value::Null)
            .await?;
        Ok(match value {
            Value::String(path) if !path.is_empty() => Some(path),
            _ => None,
        })
    }

    /// Points the backend at an install directory. Returns whether the
    /// backend accepted the path; `existing_install` tells it to expect
    /// game files already on disk.
    pub async fn set_game_path(
        &self,
        game: &str,
        path: &str,
        existing_install: bool,
    ) -> Result<bool> {
        let value = self
            .executor
            .execute(
                commands::SET_GAME_PATH,
                json!({ "game": game, "path": path, "existing_install": existing_install }),
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Fetches component metadata for a game. With `detect_existing` the
    /// backend also scans the install directory; detection may still be in
    /// progress when the reply arrives (see
    /// [`ComponentInfo::detection_in_progress`]).
    pub async fn component_info(&self, game: &str, detect_existing: bool) -> Result<ComponentInfo> {
        let value = self
            .executor
            .execute(
                commands::GET_GAME_COMPONENT_INFO,
                json!({ "game": game, "detectExisting": detect_existing }),
            )
            .await?;
        if value.is_null() {
            return Err(LauncherError::NotFound(format!(
                "component information for {game}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn set_components(&self, game: &str, components: &[String]) -> Result<()> {
        self.executor
            .execute(
                commands::SET_GAME_COMPONENTS,
                json!({ "game": game, "components": components }),
            )
            .await?;
        Ok(())
    }

    pub async fn available_space(&self, path: &str) -> Result<u64> {
        let value = self
            .executor
            .execute(commands::GET_AVAILABLE_SPACE, json!({ "path": path }))
            .await?;
        let info: SpaceInfo = serde_json::from_value(value).unwrap_or_default();
        tracing::debug!(
            "{} available at {}",
            crate::utils::format_bytes(info.available_space),
            path
        );
        Ok(info.available_space)
    }

    /// Runs the full install: persist the component selection, register the
    /// install path, then download through the verify pipeline (the backend
    /// detects missing files and fetches them).
    pub async fn install(
        &self,
        game: &str,
        components: &[String],
        path: &str,
        sink: Arc<dyn ProgressSink>,
        on_complete: Option<CompletionHook>,
    ) -> Result<TrackOutcome> {
        self.set_components(game, components).await?;

        if !self.set_game_path(game, path, false).await? {
            return Err(LauncherError::Config(format!(
                "backend rejected install path {path} for {game}"
            )));
        }

        let request = TrackRequest::new(commands::VERIFY_GAME, self.catalog.ui_id(game).to_string())
            .args(json!({ "game": game }))
            .messages(
                format!("Downloading {}...", self.catalog.display_name(game)),
                "Download complete!",
            );
        self.tracker.track(request, sink, on_complete).await
    }
}
