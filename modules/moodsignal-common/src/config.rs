use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::error::MoodSignalError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_path: PathBuf,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Retrieval
    pub profile_base_url: String,
    pub mirror_instances: Vec<String>,
    pub webdriver_url: String,
    pub max_items: usize,

    // Models
    pub text_model_url: String,
    pub demographic_model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, after merging any
    /// `.env` file found in the working directory.
    pub fn from_env() -> Result<Self, MoodSignalError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_path: PathBuf::from(env_or("DATABASE_PATH", "moodsignal.db")),
            api_host: env_or("API_HOST", "0.0.0.0"),
            api_port: parse_env("API_PORT", 5000)?,
            profile_base_url: env_or("PROFILE_BASE_URL", "https://twitter.com"),
            mirror_instances: parse_list(&env_or("MIRROR_INSTANCES", "http://xcancel.com")),
            webdriver_url: env_or("WEBDRIVER_URL", "http://localhost:9515"),
            max_items: parse_env("MAX_ITEMS", 100)?,
            text_model_url: env_or(
                "TEXT_MODEL_URL",
                "http://localhost:8501/v1/models/sentiment:predict",
            ),
            demographic_model_dir: PathBuf::from(env_or("DEMOGRAPHIC_MODEL_DIR", "models")),
        })
    }

    /// Log the effective configuration with URL userinfo masked.
    pub fn log_redacted(&self) {
        info!(
            database_path = %self.database_path.display(),
            api_host = %self.api_host,
            api_port = self.api_port,
            profile_base_url = %redact_userinfo(&self.profile_base_url),
            mirrors = ?self.mirror_instances.iter().map(|m| redact_userinfo(m)).collect::<Vec<_>>(),
            webdriver_url = %redact_userinfo(&self.webdriver_url),
            text_model_url = %redact_userinfo(&self.text_model_url),
            demographic_model_dir = %self.demographic_model_dir.display(),
            max_items = self.max_items,
            "Configuration loaded"
        );
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, MoodSignalError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| MoodSignalError::Config(format!("{key} must be a number, got {raw:?}"))),
        _ => Ok(default),
    }
}

/// Split a comma-separated list, dropping blanks and trailing slashes.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn redact_userinfo(url: &str) -> String {
    match (url.find("://"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_list_keeps_order_and_drops_blanks() {
        let mirrors = parse_list(" http://a.example/ ,, https://b.example ");
        assert_eq!(mirrors, vec!["http://a.example", "https://b.example"]);
    }

    #[test]
    fn userinfo_is_masked() {
        assert_eq!(
            redact_userinfo("http://user:pw@host:9515/wd"),
            "http://***@host:9515/wd"
        );
        assert_eq!(redact_userinfo("http://host:9515"), "http://host:9515");
    }
}
