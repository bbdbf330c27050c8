use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::NuumiError;
use crate::models::cache::{self, DEFAULT_COLLECTION};
use crate::models::post::Identity;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub username: String,
    pub avatar: Option<String>,
    pub collection: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: "you".to_string(),
            avatar: None,
            collection: DEFAULT_COLLECTION.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf, NuumiError> {
        Ok(dirs::home_dir()
            .ok_or_else(|| NuumiError::Config("Could not find home directory".to_string()))?
            .join(".config/nuumi/config.json"))
    }

    /// Reads the config at `path`, or the defaults if there is no file yet.
    pub fn load_from(path: &Path) -> Result<Self, NuumiError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(NuumiError::Config(format!(
                    "Failed to open config file at {:?}: {}",
                    path, e
                )))
            }
        };

        serde_json::from_str(&data)
            .map_err(|e| NuumiError::Config(format!("Failed to parse config JSON: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), NuumiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&self).context("Failed to serialize config to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file at {:?}", path))?;
        Ok(())
    }

    pub fn identity(&self) -> Identity {
        Identity {
            username: self.username.clone(),
            avatar_ref: self.avatar.clone(),
        }
    }

    /// Where this config's collection is mirrored.
    pub fn collection_file(&self) -> Result<PathBuf, NuumiError> {
        let dir = cache::cache_dir(self.data_dir.as_deref())?;
        Ok(cache::collection_file(&dir, &self.collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.identity(), Identity::new("you"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"username": "emma", "avatar": "emma.jpg"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.collection, "posts");
        assert_eq!(config.identity(), Identity::new("emma").with_avatar("emma.jpg"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "username = emma").unwrap();
        assert!(matches!(Config::load_from(&path), Err(NuumiError::Config(_))));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(
            config.collection_file().unwrap(),
            dir.path().join("data").join("posts.json")
        );
    }
}
