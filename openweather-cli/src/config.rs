use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use openweather::Units;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable consulted for the API key before the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// lang = "kr"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Default units when `--units` is not given.
    pub units: Option<Units>,

    /// Default language when `--lang` is not given.
    pub lang: Option<String>,
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
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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
        let dirs = ProjectDirs::from("dev", "openweather", "openweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Picks the API key: explicit flag, then environment, then this config.
    pub fn resolve_api_key(&self, flag: Option<String>, env: Option<String>) -> Result<String> {
        flag.into_iter()
            .chain(env)
            .chain(self.api_key.clone())
            .find(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `openweather configure`, set {API_KEY_ENV}, or pass --api-key."
                )
            })
    }

    pub fn units_or_default(&self, units: Option<Units>) -> Option<Units> {
        units.or(self.units)
    }

    pub fn lang_or_default(&self, lang: Option<String>) -> Option<String> {
        lang.or_else(|| self.lang.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("OPEN_KEY".into()),
            units: Some(Units::Metric),
            lang: Some("kr".into()),
        };
        cfg.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("units = \"metric\""));
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = \"kelvin\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn api_key_precedence() {
        let cfg = Config {
            api_key: Some("FILE".into()),
            ..Config::default()
        };

        let key = cfg
            .resolve_api_key(Some("FLAG".into()), Some("ENV".into()))
            .unwrap();
        assert_eq!(key, "FLAG");

        let key = cfg.resolve_api_key(None, Some("ENV".into())).unwrap();
        assert_eq!(key, "ENV");

        let key = cfg.resolve_api_key(None, Some("  ".into())).unwrap();
        assert_eq!(key, "FILE");
    }

    #[test]
    fn api_key_missing_everywhere_errors_with_hint() {
        let err = Config::default().resolve_api_key(None, None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("openweather configure"));
    }

    #[test]
    fn flags_override_config_defaults() {
        let cfg = Config {
            units: Some(Units::Imperial),
            lang: Some("de".into()),
            ..Config::default()
        };

        assert_eq!(cfg.units_or_default(None), Some(Units::Imperial));
        assert_eq!(cfg.units_or_default(Some(Units::Metric)), Some(Units::Metric));
        assert_eq!(cfg.lang_or_default(None).as_deref(), Some("de"));
        assert_eq!(cfg.lang_or_default(Some("fr".into())).as_deref(), Some("fr"));
    }
}
