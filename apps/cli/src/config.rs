use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

pub const DEFAULT_CONFIG_FILE: &str = "bioboard.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
    pub preferences_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".into(),
            api_token: None,
            request_timeout_secs: Some(30),
            log_filter: "info".into(),
            preferences_path: PathBuf::from("bioboard-preferences.toml"),
        }
    }
}

impl Settings {
    /// Zero disables the timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file if present, then environment overrides.
/// `BIOBOARD_*` names are read first and `APP__*` names win over them.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file(&mut settings, &file_cfg)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    let lookup = |names: [&str; 2]| {
        names
            .into_iter()
            .rev()
            .find_map(|name| env(name).filter(|value| !value.trim().is_empty()))
    };

    if let Some(v) = lookup(["BIOBOARD_API_URL", "APP__API_BASE_URL"]) {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup(["BIOBOARD_API_TOKEN", "APP__API_TOKEN"]) {
        settings.api_token = Some(v);
    }
    if let Some(v) = lookup(["BIOBOARD_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"]) {
        let secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("request timeout '{v}' is not a number of seconds"))?;
        settings.request_timeout_secs = Some(secs);
    }
    if let Some(v) = lookup(["BIOBOARD_LOG", "APP__LOG_FILTER"]) {
        settings.log_filter = v;
    }
    if let Some(v) = lookup(["BIOBOARD_PREFERENCES", "APP__PREFERENCES_PATH"]) {
        settings.preferences_path = PathBuf::from(v);
    }

    Ok(settings)
}

fn apply_file(
    settings: &mut Settings,
    file_cfg: &HashMap<String, toml::Value>,
) -> anyhow::Result<()> {
    let text = |key: &str| file_cfg.get(key).and_then(toml::Value::as_str);

    if let Some(v) = text("api_base_url") {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = text("api_token") {
        settings.api_token = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        let secs = v
            .as_integer()
            .and_then(|secs| u64::try_from(secs).ok())
            .context("request_timeout_secs must be a non-negative integer")?;
        settings.request_timeout_secs = Some(secs);
    }
    if let Some(v) = text("log_filter") {
        settings.log_filter = v.to_string();
    }
    if let Some(v) = text("preferences_path") {
        settings.preferences_path = PathBuf::from(v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_with(&dir.path().join(DEFAULT_CONFIG_FILE), no_env)
            .expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "api_base_url = \"https://bioboard.example.com\"\nrequest_timeout_secs = 0\nlog_filter = \"client_core=debug\"\n",
        )
        .expect("write config");

        let settings = load_settings_with(&path, no_env).expect("settings");

        assert_eq!(settings.api_base_url, "https://bioboard.example.com");
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.log_filter, "client_core=debug");
        assert_eq!(settings.api_token, None);
    }

    #[test]
    fn app_prefixed_env_wins_over_product_prefix_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "api_base_url = \"https://file.example.com\"\n").expect("write config");

        let env = |name: &str| match name {
            "BIOBOARD_API_URL" => Some("https://env.example.com".to_string()),
            "APP__API_BASE_URL" => Some("https://app.example.com".to_string()),
            "BIOBOARD_API_TOKEN" => Some("secret".to_string()),
            "APP__API_TOKEN" => Some("  ".to_string()),
            _ => None,
        };
        let settings = load_settings_with(&path, env).expect("settings");

        assert_eq!(settings.api_base_url, "https://app.example.com");
        assert_eq!(settings.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "request_timeout_secs = \"soon\"\n").expect("write config");

        let err = load_settings_with(&path, no_env).expect_err("bad timeout");
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn non_numeric_timeout_env_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = |name: &str| {
            (name == "BIOBOARD_REQUEST_TIMEOUT_SECS").then(|| "ten".to_string())
        };
        assert!(load_settings_with(&dir.path().join(DEFAULT_CONFIG_FILE), env).is_err());
    }
}
