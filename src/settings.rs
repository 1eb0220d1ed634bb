use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: Url,
    pub debug: bool,
    pub storage_dir: PathBuf,
    pub search_debounce_ms: u64,
    pub alert_auto_hide_ms: u64,
    pub rows_per_page: usize,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("api_base_url", "http://localhost:5000")?
            .set_default("debug", false)?
            .set_default("storage_dir", ".gym-console")?
            .set_default("search_debounce_ms", 300)?
            .set_default("alert_auto_hide_ms", 6000)?
            .set_default("rows_per_page", 10)?
            .set_default("request_timeout_secs", 30)?
            .add_source(File::with_name("gym-console").required(false))
            // GYM_API_BASE_URL, GYM_DEBUG, ...
            .add_source(Environment::with_prefix("GYM").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn alert_auto_hide(&self) -> Option<Duration> {
        (self.alert_auto_hide_ms > 0).then(|| Duration::from_millis(self.alert_auto_hide_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings pointing at `base_url` with every other field at its default.
    pub fn for_base_url(base_url: Url, storage_dir: PathBuf) -> Self {
        Self {
            api_base_url: base_url,
            debug: false,
            storage_dir,
            search_debounce_ms: 300,
            alert_auto_hide_ms: 6000,
            rows_per_page: 10,
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.search_debounce(), Duration::from_millis(300));
        assert_eq!(settings.rows_per_page, 10);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        // SAFETY: serialised with the other env-dependent tests.
        unsafe {
            std::env::set_var("GYM_API_BASE_URL", "https://gym.example.com");
            std::env::set_var("GYM_ROWS_PER_PAGE", "25");
        }
        let settings = Settings::from_env();
        unsafe {
            std::env::remove_var("GYM_API_BASE_URL");
            std::env::remove_var("GYM_ROWS_PER_PAGE");
        }
        let settings = settings.unwrap();
        assert_eq!(settings.api_base_url.as_str(), "https://gym.example.com/");
        assert_eq!(settings.rows_per_page, 25);
    }

    #[test]
    #[serial]
    fn test_invalid_base_url() {
        unsafe {
            std::env::set_var("GYM_API_BASE_URL", "not a url");
        }
        let settings = Settings::from_env();
        unsafe {
            std::env::remove_var("GYM_API_BASE_URL");
        }
        assert!(settings.is_err());
    }

    #[test]
    fn test_zero_auto_hide_disables() {
        let mut settings =
            Settings::for_base_url(Url::parse("http://localhost").unwrap(), PathBuf::from("x"));
        settings.alert_auto_hide_ms = 0;
        assert!(settings.alert_auto_hide().is_none());
    }
}
