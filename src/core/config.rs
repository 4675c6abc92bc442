use crate::api::client::DEFAULT_API_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "LOADIMPACT_API_V3_TOKEN";
pub const DEFAULT_PROJECT_ENV: &str = "LOADIMPACT_DEFAULT_PROJECT";
pub const API_URL_ENV: &str = "LOADIMPACT_API_URL";

/// User settings, stored as JSON in the platform config directory.
/// Environment variables take precedence over stored values.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`, creating an empty config file when there is none
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            println!("Creating config file in {}", path.display());
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // An empty or unreadable file is treated as a fresh config
        if data.is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config file {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("LoadImpact").join("config.json"))
    }

    /// API token from the environment or the config file
    pub fn api_token(&self) -> Option<String> {
        override_with(env_value(TOKEN_ENV), self.api_token.clone())
    }

    pub fn set_api_token(&mut self, token: String) {
        self.api_token = Some(token);
    }

    /// Project used when a command gets no `--project_id`
    pub fn default_project(&self) -> Option<u64> {
        let from_env = env_value(DEFAULT_PROJECT_ENV).and_then(|v| v.parse().ok());
        override_with(from_env, self.default_project)
    }

    pub fn api_url(&self) -> String {
        override_with(env_value(API_URL_ENV), self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn override_with<T>(from_env: Option<T>, stored: Option<T>) -> Option<T> {
    from_env.or(stored)
}
