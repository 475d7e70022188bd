use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = ".accountability";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "accountability.log";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub session_token: Option<String>,
    /// Period of the last-update refresh.
    pub refresh_secs: u64,
    /// No timeout when unset: a hung request stays in its loading state.
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_token: None,
            refresh_secs: DEFAULT_REFRESH_SECS,
            request_timeout_secs: None,
            log_file: None,
        }
    }
}

impl Config {
    /// `~/.accountability`
    pub fn default_dir() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Reads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let file = File::open(path)
            .with_context(|| format!("Could not open config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::default_dir()?.join(LOG_FILE_NAME)),
        }
    }

    /// Stores `token` as the session in the config file at `path`, keeping
    /// every other value in that file. `None` logs out.
    pub fn store_session(path: &Path, token: Option<String>) -> Result<Self> {
        let mut config = Self::load_or_init(path)?;
        config.session_token = token;
        config.save(path)?;
        Ok(config)
    }

    /// Applies command line / environment values on top of the file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if session_token.is_some() {
            self.session_token = session_token;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"base_url":"http://10.0.0.2:8000","session_token":"tok"}"#).unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.session_token.as_deref(), Some("tok"));
        assert_eq!(config.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_or_init(&path).is_err());
    }

    #[test]
    fn test_store_session_then_log_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"base_url":"http://10.0.0.2:8000","refresh_secs":10}"#).unwrap();

        Config::store_session(&path, Some("abc".to_string())).unwrap();
        let stored = Config::load_or_init(&path).unwrap();
        assert_eq!(stored.session_token.as_deref(), Some("abc"));
        assert_eq!(stored.base_url, "http://10.0.0.2:8000");
        assert_eq!(stored.refresh_secs, 10);

        let cleared = Config::store_session(&path, None).unwrap();
        assert_eq!(cleared.session_token, None);
        assert_eq!(Config::load_or_init(&path).unwrap().session_token, None);
        assert_eq!(Config::load_or_init(&path).unwrap().refresh_secs, 10);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://example:9000".to_string()), None);
        assert_eq!(config.base_url, "http://example:9000");
        assert_eq!(config.session_token, None);

        let config = config.with_overrides(None, Some("abc".to_string()));
        assert_eq!(config.base_url, "http://example:9000");
        assert_eq!(config.session_token.as_deref(), Some("abc"));
    }
}
