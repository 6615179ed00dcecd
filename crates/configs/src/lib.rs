//! # configs
//!
//! Runtime settings for the `rusty-press` binary. Layered lowest to highest:
//! built-in defaults, an optional `rusty-press.toml`, then `RUSTY_PRESS__*`
//! environment variables (`RUSTY_PRESS__STORAGE__BACKEND=sqlite`).

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{0}`: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory for the file backend.
    pub path: PathBuf,
    pub sqlite_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaSettings {
    pub root: PathBuf,
    pub url_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub media: MediaSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Reads `.env`, `rusty-press.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let builder = defaults()?
            .add_source(File::with_name("rusty-press").required(false))
            .add_source(
                Environment::with_prefix("RUSTY_PRESS")
                    .prefix_separator("__")
                    .separator("__"),
            );
        Self::build(builder)
    }

    /// Defaults overlaid with an in-memory TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::build(defaults()?.add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.username.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.username", "must not be empty".into()));
        }
        if self.auth.password.expose_secret().is_empty() {
            return Err(ConfigError::Invalid("auth.password", "must not be empty".into()));
        }
        if !self.media.url_prefix.starts_with('/') && !self.media.url_prefix.contains("://") {
            return Err(ConfigError::Invalid(
                "media.url_prefix",
                format!("`{}` is neither absolute nor a URL", self.media.url_prefix),
            ));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(config::Config::builder()
        .set_default("storage.backend", "file")?
        .set_default("storage.path", "./data")?
        .set_default("storage.sqlite_url", "sqlite://rusty-press.db")?
        .set_default("media.root", "./data/uploads")?
        .set_default("media.url_prefix", "/uploads")?
        .set_default("auth.username", "admin")?
        .set_default("auth.password", "password")?
        .set_default("log.filter", "info")?
        .set_default("log.json", false)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_file() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.media.url_prefix, "/uploads");
        assert_eq!(settings.auth.password.expose_secret(), "password");
        assert!(!settings.log.json);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            [storage]
            backend = "sqlite"
            sqlite_url = "sqlite::memory:"

            [log]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
        assert_eq!(settings.storage.sqlite_url, "sqlite::memory:");
        assert_eq!(settings.storage.path, PathBuf::from("./data"));
        assert!(settings.log.json);
    }

    #[test]
    fn rejects_unknown_backend_and_blank_account() {
        assert!(matches!(
            Settings::from_toml("[storage]\nbackend = \"redis\""),
            Err(ConfigError::Load(_))
        ));
        assert!(matches!(
            Settings::from_toml("[auth]\nusername = \"  \""),
            Err(ConfigError::Invalid("auth.username", _))
        ));
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let settings = Settings::from_toml("[auth]\npassword = \"hunter2\"").unwrap();
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
