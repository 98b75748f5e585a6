use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

use crate::error::MenuError;

pub const CONFIG_FILE: &str = "menuannam.toml";

pub static TOKEN_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://egsbwqh7kildllpkijk6nt4soq0wlgpe.lambda-url.ap-southeast-1.on.aws/")
        .expect("valid token endpoint url")
});

/// Process-wide configuration for the binary. Library types take explicit values.
///
/// A load failure is kept so the binary can report it instead of running on defaults.
pub static CONFIG: LazyLock<Result<Config, MenuError>> = LazyLock::new(Config::load);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: String,
    pub data_dir: PathBuf,
    /// Defaults to `sqlite:{data_dir}/flashcards.db` when unset.
    pub database_url: Option<String>,
    pub remote: RemoteConfig,
    pub search: SearchConfig,
    pub study: StudyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub token_url: Url,
    /// No public default; audio requests fail until this is configured.
    pub audio_url: Option<Url>,
    pub proxy: Option<Url>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub empty_term: EmptyTermPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub lesson_size: usize,
}

/// How an empty search term is treated by the filtered search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTermPolicy {
    /// The field is not constrained.
    #[default]
    MatchAll,
    /// The field matches no row.
    MatchNone,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            data_dir: PathBuf::from(".menuannam"),
            database_url: None,
            remote: RemoteConfig::default(),
            search: SearchConfig::default(),
            study: StudyConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.clone(),
            audio_url: None,
            proxy: None,
            connect_timeout_secs: 30,
            timeout_secs: 30,
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self { lesson_size: 3 }
    }
}

impl Config {
    /// Defaults, then `menuannam.toml`, then `MENUANNAM_*` env vars (`__` for nesting).
    pub fn load() -> Result<Self, MenuError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("MENUANNAM_").split("__"))
            .extract()?;
        Ok(cfg)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite:{}", self.data_dir.join("flashcards.db").display()))
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join("user_credentials.json")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }
}
