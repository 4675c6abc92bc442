use crate::api::ApiClient;
use crate::core::config::{Config, TOKEN_ENV};
use crate::ui::prompts::prompt_value;
use anyhow::{Context, Result};

/// Per-invocation connection to the platform, handed to every command
pub struct Session {
    client: ApiClient,
    default_project: Option<u64>,
}

impl Session {
    pub fn new(client: ApiClient, default_project: Option<u64>) -> Self {
        Self {
            client,
            default_project,
        }
    }

    /// Build the session from the user's config, asking for the API token
    /// (and storing it) when neither the environment nor the file has one
    pub fn from_config(mut config: Config) -> Result<Self> {
        let token = match config.api_token() {
            Some(token) => token,
            None => {
                let token = prompt_value(TOKEN_ENV)?;
                if let Ok(path) = Config::get_config_path() {
                    println!("Adding key and value to config at {}", path.display());
                }
                config.set_api_token(token.clone());
                config.save()?;
                token
            }
        };

        let api_url = config.api_url();
        let client = ApiClient::new(token, &api_url)
            .with_context(|| format!("Failed to create API client for {}", api_url))?;

        Ok(Self::new(client, config.default_project()))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The explicit project id, falling back to the configured default
    pub fn project_id(&self, explicit: Option<u64>) -> Option<u64> {
        explicit.or(self.default_project)
    }
}
