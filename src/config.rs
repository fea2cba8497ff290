use serde::Deserialize;
use std::path::PathBuf;

/// Settings read from ~/.config/hubble/config.toml. Every field has a
/// default, so a missing file just means stock GitHub.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment variable holding the API token.
    pub token_env: String,
    /// Shell command run when the env var is unset, e.g. `gh auth token`.
    pub token_command: Option<String>,
    /// API base URI override for GitHub Enterprise installs.
    pub api_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_env: "GITHUB_TOKEN".to_string(),
            token_command: Some("gh auth token".to_string()),
            api_base: None,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("hubble").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }
}
