use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One reading from the backend's shared progress endpoint.
///
/// `active == false` is the terminal signal for the current operation. The
/// optional `status` field lets newer backends report whether the operation
/// actually succeeded; when absent the terminal snapshot is treated as
/// success, matching older backends that only ever flipped `active`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub active: bool,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<OperationStatus>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Success,
    Failure,
}

/// Terminal result of a tracked operation. Failures surface as
/// `LauncherError`, so callers always observe exactly one of
/// completed, cancelled, or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    Completed,
    Cancelled,
}

/// Identity of one run of the track-to-completion lifecycle.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub command: String,
    pub tag: String,
    pub started_at: i64,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InstallStatus {
    Installed,
    Partial,
    NotSetup,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub install_status: InstallStatus,
    pub is_running: bool,
    pub has_any_setup: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// Wire shape of `get-game-component-info`. Component detection may still be
/// running backend-side, in which case `detection_in_progress` is set and
/// `installed` is not yet authoritative.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    #[serde(default)]
    pub components: HashMap<String, ComponentEntry>,
    #[serde(default)]
    pub sizes: HashMap<String, u64>,
    #[serde(default)]
    pub installed: Vec<String>,
    #[serde(default)]
    pub detection_in_progress: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceInfo {
    #[serde(default)]
    pub available_space: u64,
}
