use std::{fs, path::PathBuf};

use common::id::RecordId;
use common::store::{Store, StoreError, StoreOptions};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "arbor";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const FILES_DIR_NAME: &str = "files";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage root holding records and sections
    pub storage_root: PathBuf,
    /// Id of the root directory record
    pub root_id: RecordId,
    /// Refuse mounts that would create a cycle
    #[serde(default)]
    pub reject_cycles: bool,
    /// Default log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            reject_cycles: self.reject_cycles,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the arbor directory (~/.arbor)
    pub arbor_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the arbor directory path (custom or default ~/.arbor)
    pub fn arbor_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new arbor directory and an empty storage root.
    ///
    /// The storage root defaults to `<arbor_dir>/files`.
    pub fn init(
        custom_path: Option<PathBuf>,
        storage_root: Option<PathBuf>,
        reject_cycles: bool,
    ) -> Result<Self, StateError> {
        let arbor_dir = Self::arbor_dir(custom_path)?;

        let config_path = arbor_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&arbor_dir)?;

        let storage_root = storage_root.unwrap_or_else(|| arbor_dir.join(FILES_DIR_NAME));
        let root_id = Store::init(&storage_root)?;

        let config = AppConfig {
            storage_root,
            root_id,
            reject_cycles,
            log_level: default_log_level(),
        };
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            arbor_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the arbor directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let arbor_dir = Self::arbor_dir(custom_path)?;
        let config_path = arbor_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            arbor_dir,
            config_path,
            config,
        })
    }

    /// Open the configured storage root
    pub fn open_store(&self) -> Result<Store, StateError> {
        let store = Store::open(
            &self.config.storage_root,
            self.config.root_id,
            self.config.store_options(),
        )?;
        Ok(store)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("arbor directory not initialized. Run 'arbor init' first")]
    NotInitialized,

    #[error("arbor directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("state");

        let state = AppState::init(Some(dir.clone()), None, true).unwrap();
        assert_eq!(state.config.storage_root, dir.join(FILES_DIR_NAME));
        assert!(state.config.reject_cycles);

        let loaded = AppState::load(Some(dir)).unwrap();
        assert_eq!(loaded.config, state.config);

        let store = loaded.open_store().unwrap();
        assert_eq!(store.get_root(), state.config.root_id);
        assert!(store.options().reject_cycles);
    }

    #[test]
    fn test_init_twice() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_path_buf();

        AppState::init(Some(dir.clone()), None, false).unwrap();
        let result = AppState::init(Some(dir), None, false);
        assert!(matches!(result, Err(StateError::AlreadyInitialized)));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp = tempfile::tempdir().unwrap();
        let result = AppState::load(Some(temp.path().join("nothing")));
        assert!(matches!(result, Err(StateError::NotInitialized)));
    }

    #[test]
    fn test_custom_storage_root() {
        let temp = tempfile::tempdir().unwrap();
        let storage = temp.path().join("elsewhere");

        let state =
            AppState::init(Some(temp.path().join("state")), Some(storage.clone()), false).unwrap();
        assert_eq!(state.config.storage_root, storage);
        assert!(storage.join(state.config.root_id.to_string()).exists());
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = toml::from_str(
            "storage_root = \"/srv/arbor\"\nroot_id = \"1111111111111111111112\"\n",
        )
        .unwrap();
        assert!(!config.reject_cycles);
        assert_eq!(config.log_level, "info");
    }
}
