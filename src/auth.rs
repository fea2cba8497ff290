use crate::config::Config;
use crate::error::{HubbleError, Result};

/// Resolve the API token: env var first, then the stored token file, then
/// the configured fallback command.
pub fn load_token(config: &Config) -> Result<String> {
    if let Ok(token) = std::env::var(&config.token_env) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    if let Some(token) = load_stored_token() {
        return Ok(token);
    }

    if let Some(cmd) = &config.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Ok(token);
        }
    }

    Err(HubbleError::Auth(format!(
        "no API token found; set {} or configure token_command",
        config.token_env
    )))
}

/// Stored token path: ~/.config/hubble/token
fn token_path() -> Option<std::path::PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("hubble").join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Run a shell command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_captures_stdout() {
        assert_eq!(try_cli_token("echo s3cret"), Some("s3cret".to_string()));
    }

    #[test]
    fn cli_token_failure_is_none() {
        assert_eq!(try_cli_token("exit 1"), None);
    }

    #[test]
    fn cli_token_empty_stdout_is_none() {
        assert_eq!(try_cli_token("true"), None);
    }
}
