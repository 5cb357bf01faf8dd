use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::errors::Result;
use crate::executor::{commands, CommandExecutor};
use crate::models::InstallStatus;

/// Property key constants shared with the backend settings store.
pub mod keys {
    pub const RESTORE_LAST_PAGE: &str = "launcher-restore-last-page";
    pub const SKIP_HASH_VERIFICATION: &str = "launcher-skip-hash-verification";
    pub const CLOSE_ON_LAUNCH: &str = "launcher-close-on-launch";
    pub const SKIP_CLIENT_UPDATE: &str = "launcher-skip-client-update";
    pub const LAST_GAME_PAGE: &str = "last-game-page";

    /// Per-game suffixes, combined with a game id by the backend.
    pub const INSTALL: &str = "install";
    pub const IS_INSTALLED: &str = "is-installed";
    pub const LAUNCH_OPTIONS: &str = "launch-options";
    pub const GAME_MODE: &str = "game-mode";
    pub const SKIP_INTRO_CINEMATIC: &str = "skip-intro-cinematic";
    pub const DETECTED_COMPONENTS: &str = "detected-components";
    pub const SELECTED_COMPONENTS: &str = "selected-components";
}

/// Key-value passthrough to the backend settings store.
#[derive(Clone)]
pub struct PropertyService {
    executor: Arc<dyn CommandExecutor>,
}

impl PropertyService {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .executor
            .execute(commands::GET_PROPERTY, Value::String(key.to_string()))
            .await?;
        Ok(as_nonempty_string(value))
    }

    /// Writes a batch of properties in one round trip.
    pub async fn set(&self, properties: Map<String, Value>) -> Result<()> {
        self.executor
            .execute(commands::SET_PROPERTY, Value::Object(properties))
            .await?;
        Ok(())
    }

    pub async fn set_one(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut properties = Map::new();
        properties.insert(key.to_string(), value.into());
        self.set(properties).await
    }

    pub async fn game_property(&self, game: &str, suffix: &str) -> Result<Option<String>> {
        let value = self
            .executor
            .execute(
                commands::GET_GAME_PROPERTY,
                json!({ "game": game, "suffix": suffix }),
            )
            .await?;
        Ok(as_nonempty_string(value))
    }

    pub async fn set_game_property(
        &self,
        game: &str,
        suffix: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.executor
            .execute(
                commands::SET_GAME_PROPERTY,
                json!({ "game": game, "suffix": suffix, "value": value.into() }),
            )
            .await?;
        Ok(())
    }

    pub async fn reset_settings(&self) -> Result<()> {
        self.executor
            .execute(commands::RESET_SETTINGS, Value::Null)
            .await?;
        Ok(())
    }

    /// Derives installation state from the settings store. A lookup failure
    /// degrades to `NotSetup` rather than erroring; a game that cannot be
    /// read is treated as not configured.
    pub async fn installation_status(&self, game: &str) -> InstallStatus {
        let installed = self
            .game_property(game, keys::IS_INSTALLED)
            .await
            .ok()
            .flatten()
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if installed {
            return InstallStatus::Installed;
        }

        let has_path = self
            .game_property(game, keys::INSTALL)
            .await
            .ok()
            .flatten()
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        if has_path {
            InstallStatus::Partial
        } else {
            InstallStatus::NotSetup
        }
    }
}

fn as_nonempty_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    /// In-memory stand-in for the backend settings store.
    #[derive(Default)]
    struct KvExecutor {
        store: StdMutex<HashMap<String, Value>>,
    }

    impl KvExecutor {
        fn seed(&self, key: &str, value: Value) {
            self.store.lock().unwrap().insert(key.to_string(), value);
        }

        fn game_key(game: &str, suffix: &str) -> String {
            format!("{game}-{suffix}")
        }
    }

    #[async_trait]
    impl CommandExecutor for KvExecutor {
        async fn execute(&self, command: &str, args: Value) -> Result<Value> {
            let mut store = self.store.lock().unwrap();
            match command {
                commands::GET_PROPERTY => {
                    let key = args.as_str().unwrap_or_default();
                    Ok(store.get(key).cloned().unwrap_or(Value::Null))
                }
                commands::SET_PROPERTY => {
                    if let Value::Object(map) = args {
                        for (key, value) in map {
                            store.insert(key, value);
                        }
                    }
                    Ok(Value::Null)
                }
                commands::GET_GAME_PROPERTY => {
                    let key = Self::game_key(
                        args["game"].as_str().unwrap_or_default(),
                        args["suffix"].as_str().unwrap_or_default(),
                    );
                    Ok(store.get(&key).cloned().unwrap_or(Value::Null))
                }
                commands::SET_GAME_PROPERTY => {
                    let key = Self::game_key(
                        args["game"].as_str().unwrap_or_default(),
                        args["suffix"].as_str().unwrap_or_default(),
                    );
                    store.insert(key, args["value"].clone());
                    Ok(Value::Null)
                }
                commands::RESET_SETTINGS => {
                    store.clear();
                    Ok(Value::Null)
                }
                other => panic!("unexpected command: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn round_trips_launcher_properties() {
        let executor = Arc::new(KvExecutor::default());
        let properties = PropertyService::new(executor);

        assert_eq!(properties.get(keys::LAST_GAME_PAGE).await.unwrap(), None);
        properties
            .set_one(keys::LAST_GAME_PAGE, "boiii")
            .await
            .unwrap();
        assert_eq!(
            properties.get(keys::LAST_GAME_PAGE).await.unwrap(),
            Some("boiii".to_string())
        );

        properties.reset_settings().await.unwrap();
        assert_eq!(properties.get(keys::LAST_GAME_PAGE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_strings_read_as_absent() {
        let executor = Arc::new(KvExecutor::default());
        executor.seed(keys::CLOSE_ON_LAUNCH, Value::String(String::new()));
        let properties = PropertyService::new(executor);

        assert_eq!(properties.get(keys::CLOSE_ON_LAUNCH).await.unwrap(), None);
    }

    #[tokio::test]
    async fn installation_status_tiers() {
        let executor = Arc::new(KvExecutor::default());
        let properties = PropertyService::new(executor.clone());

        assert_eq!(
            properties.installation_status("bo3").await,
            InstallStatus::NotSetup
        );

        executor.seed(
            &KvExecutor::game_key("bo3", keys::INSTALL),
            Value::String("C:/games/bo3".to_string()),
        );
        assert_eq!(
            properties.installation_status("bo3").await,
            InstallStatus::Partial
        );

        executor.seed(
            &KvExecutor::game_key("bo3", keys::IS_INSTALLED),
            Value::String("true".to_string()),
        );
        assert_eq!(
            properties.installation_status("bo3").await,
            InstallStatus::Installed
        );
    }

    #[tokio::test]
    async fn game_properties_are_scoped_per_game() {
        let executor = Arc::new(KvExecutor::default());
        let properties = PropertyService::new(executor);

        properties
            .set_game_property("aw", keys::GAME_MODE, "zm")
            .await
            .unwrap();

        assert_eq!(
            properties.game_property("aw", keys::GAME_MODE).await.unwrap(),
            Some("zm".to_string())
        );
        assert_eq!(
            properties.game_property("bo3", keys::GAME_MODE).await.unwrap(),
            None
        );
    }
}
