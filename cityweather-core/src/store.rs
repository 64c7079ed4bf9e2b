//! Persistence for the last successfully searched city.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::config::project_dirs;

pub trait CityStore: Send + Sync + Debug {
    fn load_last_city(&self) -> Result<Option<String>>;
    fn save_last_city(&self, city: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedState {
    last_city: Option<String>,
}

/// TOML file under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileCityStore {
    path: PathBuf,
}

impl FileCityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("state.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CityStore for FileCityStore {
    fn load_last_city(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let state: SavedState = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(state.last_city)
    }

    fn save_last_city(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let state = SavedState {
            last_city: Some(city.to_string()),
        };
        let toml =
            toml::to_string_pretty(&state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

/// Process-local store, used when nothing should touch disk.
#[derive(Debug, Default)]
pub struct MemoryCityStore {
    city: Mutex<Option<String>>,
}

impl MemoryCityStore {
    pub fn with_city(city: &str) -> Self {
        Self {
            city: Mutex::new(Some(city.to_string())),
        }
    }
}

impl CityStore for MemoryCityStore {
    fn load_last_city(&self) -> Result<Option<String>> {
        let guard = self
            .city
            .lock()
            .map_err(|_| anyhow::anyhow!("city store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save_last_city(&self, city: &str) -> Result<()> {
        let mut guard = self
            .city
            .lock()
            .map_err(|_| anyhow::anyhow!("city store lock poisoned"))?;
        *guard = Some(city.to_string());
        Ok(())
    }
}
