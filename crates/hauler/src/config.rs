//! Tunables of the session layer, persisted as a TOML file.
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;

use serde::Deserialize;
use serde::Serialize;
use tokio::fs::create_dir_all;
use tokio::fs::File;
use tokio::fs::OpenOptions;

use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How many unconsumed bytes an HTTP connection inspects on each
    /// receive poll.
    pub peek_window: usize,

    /// Upper bound of a response header section. Servers that send more
    /// than this before the blank line are dropped.
    pub max_header_len: usize,

    /// Latency estimate of a peer before any sample was taken, in
    /// milliseconds.
    pub initial_latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peek_window: Config::DEFAULT_PEEK_WINDOW,
            max_header_len: Config::DEFAULT_MAX_HEADER_LEN,
            initial_latency_ms: Config::DEFAULT_LATENCY_MS,
        }
    }
}

impl Config {
    pub const DEFAULT_PEEK_WINDOW: usize = 512;
    pub const DEFAULT_MAX_HEADER_LEN: usize = 8192;
    pub const DEFAULT_LATENCY_MS: u64 = 1500;

    /// Parse a configuration from TOML text. Missing keys fall back to their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let mut config = toml::from_str::<Config>(s)?;
        // a zero window would never make progress
        if config.peek_window == 0 {
            config.peek_window = Config::DEFAULT_PEEK_WINDOW;
        }
        Ok(config)
    }

    /// Returns the configuration fs File and it's path,
    ///
    /// If it doesn't exist, or is not valid TOML, we write a default
    /// configuration file at the user's config folder.
    ///
    /// # Errors
    ///
    /// This fn can fail if the program does not have access to the config
    /// dir or to the file.
    pub async fn config_file() -> Result<(File, PathBuf), Error> {
        let dotfile = ProjectDirs::from("", "", "Hauler").ok_or(Error::HomeInvalid)?;
        let mut config_path = dotfile.config_dir().to_path_buf();

        if !config_path.exists() {
            create_dir_all(&config_path).await.map_err(|_| {
                Error::FolderOpenError(config_path.display().to_string())
            })?;
        }

        config_path.push("config.toml");

        let mut config_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config_path)
            .await?;

        let mut dst = String::new();
        config_file.read_to_string(&mut dst).await?;

        if Self::from_toml_str(&dst).is_err() || dst.trim().is_empty() {
            let config_str = toml::to_string(&Config::default())?;
            let mut config_file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&config_path)
                .await?;
            config_file.write_all(config_str.as_bytes()).await?;
            config_file.flush().await?;
        }

        let config_file = OpenOptions::new().read(true).open(&config_path).await?;

        Ok((config_file, config_path))
    }

    /// Load the configuration file and transform it into Self.
    /// If the file does not exist, it tries to create the file
    /// with the default configurations.
    pub async fn load() -> Result<Self, Error> {
        let (mut file, _p) = Self::config_file().await?;

        let mut config_str = String::new();
        file.read_to_string(&mut config_str).await?;

        Self::from_toml_str(&config_str)
    }

    /// Read a configuration from an explicit path.
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, Error> {
        let mut file = File::open(path.as_ref()).await?;
        let mut config_str = String::new();
        file.read_to_string(&mut config_str).await?;
        Self::from_toml_str(&config_str)
    }
}
