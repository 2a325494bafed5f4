use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "trunkfat.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub error_banner_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            error_banner_ms: 5_000,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn banner_delay(&self) -> Duration {
        Duration::from_millis(self.error_banner_ms)
    }

    pub fn parsed_server_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("server url '{}' must use http or https", self.server_url);
        }
        Ok(url)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// File values override defaults; environment overrides both.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("server_url").and_then(|v| v.as_str()) {
                settings.server_url = v.to_string();
            }
            if let Some(v) = file_cfg
                .get("error_banner_ms")
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok())
            {
                settings.error_banner_ms = v;
            }
            if let Some(v) = file_cfg.get("log_filter").and_then(|v| v.as_str()) {
                settings.log_filter = v.to_string();
            }
        }
    }

    if let Some(v) = env("TRUNKFAT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__ERROR_BANNER_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.error_banner_ms = parsed;
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_settings_file(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("trunkfat_settings_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn missing_file_and_env_yield_defaults() {
        let settings = load_settings_from(Path::new("/nonexistent/trunkfat.toml"), |_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.banner_delay(), Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_file() {
        let path = temp_settings_file(
            "server_url = \"http://file:5000\"\nerror_banner_ms = 3000\nlog_filter = \"debug\"\n",
        );
        let settings = load_settings_from(&path, |key| match key {
            "APP__SERVER_URL" => Some("http://env:8080".to_string()),
            _ => None,
        });
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.server_url, "http://env:8080");
        assert_eq!(settings.error_banner_ms, 3_000);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn unparsable_banner_delay_is_ignored() {
        let settings = load_settings_from(Path::new("/nonexistent"), |key| {
            (key == "APP__ERROR_BANNER_MS").then(|| "soon".to_string())
        });
        assert_eq!(settings.error_banner_ms, 5_000);
    }

    #[test]
    fn server_url_must_be_http() {
        let mut settings = Settings::default();
        assert!(settings.parsed_server_url().is_ok());
        settings.server_url = "ftp://example.com".into();
        assert!(settings.parsed_server_url().is_err());
        settings.server_url = "not a url".into();
        assert!(settings.parsed_server_url().is_err());
    }
}
