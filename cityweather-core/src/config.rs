use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://openweathermap.org/img/wn/";
pub const DEFAULT_LOCATION_ENDPOINT: &str = "http://ip-api.com/json";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// location_enabled = true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub image_base_url: String,
    pub timeout_secs: u64,

    /// Whether automatic location lookup is allowed.
    pub location_enabled: bool,
    pub location_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout_secs: 10,
            location_enabled: false,
            location_endpoint: DEFAULT_LOCATION_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `cityweather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "cityweather", "cityweather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cityweather-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let path = scratch_path("roundtrip");
        let cfg = Config {
            api_key: Some("KEY".into()),
            location_enabled: true,
            timeout_secs: 3,
            ..Config::default()
        };

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert!(!cfg.location_enabled);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn env_key_wins_over_stored_key() {
        let cfg = Config {
            api_key: Some("STORED".into()),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_api_key_with(Some("ENV".into())).unwrap(), "ENV");
        assert_eq!(cfg.resolve_api_key_with(Some("  ".into())).unwrap(), "STORED");
        assert_eq!(cfg.resolve_api_key_with(None).unwrap(), "STORED");
    }

    #[test]
    fn missing_key_errors_with_hint() {
        let err = Config::default().resolve_api_key_with(None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("cityweather configure"));
    }
}
