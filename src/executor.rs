use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;

/// The host-provided asynchronous bridge that dispatches named commands to
/// the backend process. Long-running commands return once the work is
/// queued, never once it is done; progress is read separately through
/// [`commands::GET_UPDATE_PROGRESS`].
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &str, args: Value) -> Result<Value>;
}

/// Backend command vocabulary.
pub mod commands {
    pub const LAUNCH_GAME: &str = "launch-game";
    pub const VERIFY_GAME: &str = "verify-game";
    pub const UNLOCK_ALL: &str = "unlock-all";
    pub const DELETE_GAME: &str = "delete-game";
    pub const STOP_GAME: &str = "stop-game";
    pub const IS_GAME_RUNNING: &str = "is-game-running";

    /// Stateless read of the shared progress endpoint; safe at high
    /// frequency, takes no args.
    pub const GET_UPDATE_PROGRESS: &str = "get-update-progress";
    /// Global best-effort cancel of whatever operation is in flight.
    pub const CANCEL_UPDATE: &str = "cancel-update";

    pub const GET_PROPERTY: &str = "get-property";
    pub const SET_PROPERTY: &str = "set-property";
    pub const GET_GAME_PROPERTY: &str = "get-game-property";
    pub const SET_GAME_PROPERTY: &str = "set-game-property";
    pub const RESET_SETTINGS: &str = "reset-settings";

    pub const BROWSE_FOLDER: &str = "browse-folder";
    pub const SET_GAME_PATH: &str = "set-game-path";
    pub const GET_GAME_COMPONENT_INFO: &str = "get-game-component-info";
    pub const SET_GAME_COMPONENTS: &str = "set-game-components";
    pub const GET_AVAILABLE_SPACE: &str = "get-available-space";
}
