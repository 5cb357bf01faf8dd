use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Launch modes a game can expose. The backend receives the short wire id
/// (`sp`, `mp`, `zm`, `sv`); the labels exist for mode-selection UI.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Sp,
    Mp,
    Zm,
    Sv,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Sp => "sp",
            GameMode::Mp => "mp",
            GameMode::Zm => "zm",
            GameMode::Sv => "sv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Sp => "Singleplayer",
            GameMode::Mp => "Multiplayer",
            GameMode::Zm => "Zombies",
            GameMode::Sv => "Survival",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Sp => "Play the campaign",
            GameMode::Mp => "Play online with others",
            GameMode::Zm => "Fight hordes of zombies",
            GameMode::Sv => "Survive against waves of enemies",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sp" => Some(GameMode::Sp),
            "mp" => Some(GameMode::Mp),
            "zm" => Some(GameMode::Zm),
            "sv" => Some(GameMode::Sv),
            _ => None,
        }
    }
}

/// Static configuration for one supported game. The backend id is the
/// canonical identity; the ui id is what page routing and progress theming
/// use, and the two are not always equal.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub id: String,
    pub ui_id: String,
    pub display_name: String,
    pub code_name: String,
    pub default_install_dir: String,
    #[serde(default)]
    pub modes: Vec<GameMode>,
    #[serde(default)]
    pub special_settings: Vec<String>,
}

impl GameConfig {
    pub fn has_multiple_modes(&self) -> bool {
        self.modes.len() > 1
    }
}

/// Registry of supported games with bidirectional id mapping. Entries are
/// supplied by the embedding application at startup.
#[derive(Clone, Debug, Default)]
pub struct GameCatalog {
    by_id: HashMap<String, GameConfig>,
    ui_to_backend: HashMap<String, String>,
}

impl GameCatalog {
    pub fn new(entries: Vec<GameConfig>) -> Self {
        let mut by_id = HashMap::new();
        let mut ui_to_backend = HashMap::new();
        for entry in entries {
            ui_to_backend.insert(entry.ui_id.clone(), entry.id.clone());
            by_id.insert(entry.id.clone(), entry);
        }
        Self {
            by_id,
            ui_to_backend,
        }
    }

    pub fn get(&self, id: &str) -> Option<&GameConfig> {
        self.by_id.get(id)
    }

    pub fn get_by_ui_id(&self, ui_id: &str) -> Option<&GameConfig> {
        self.get(self.backend_id(ui_id))
    }

    /// Maps a ui id to its backend id; unknown ids pass through unchanged.
    pub fn backend_id<'a>(&'a self, ui_id: &'a str) -> &'a str {
        self.ui_to_backend
            .get(ui_id)
            .map(String::as_str)
            .unwrap_or(ui_id)
    }

    /// Reverse mapping; unknown ids pass through unchanged.
    pub fn ui_id<'a>(&'a self, backend_id: &'a str) -> &'a str {
        self.by_id
            .get(backend_id)
            .map(|config| config.ui_id.as_str())
            .unwrap_or(backend_id)
    }

    pub fn display_name<'a>(&'a self, backend_id: &'a str) -> &'a str {
        self.by_id
            .get(backend_id)
            .map(|config| config.display_name.as_str())
            .unwrap_or(backend_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.by_id.keys().map(String::as_str).collect()
    }

    pub fn ui_ids(&self) -> Vec<&str> {
        self.by_id.values().map(|config| config.ui_id.as_str()).collect()
    }
}
