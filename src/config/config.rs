use crate::config::Features;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File name looked up in the search directory when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "issue-signals.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base")]
    pub api_base: Url,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Assignees with more open issues than this are flagged as overloaded
    #[serde(default = "default_workload_overload_threshold")]
    pub workload_overload_threshold: u64,

    #[serde(default)]
    pub features: Features,
}

fn default_api_base() -> Url {
    Url::parse("https://api.github.com").expect("default API base is a valid URL")
}

fn default_user_agent() -> String {
    "issue-signals".to_string()
}

const fn default_workload_overload_threshold() -> u64 {
    5
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// With no explicit `config_path`, `issue-signals.toml` in `search_dir` is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(search_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let (final_path, text): (PathBuf, String) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).with_context(|| format!("reading configuration file '{}'", path.display()))?;
            (path.to_path_buf(), text)
        } else {
            let path = search_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).with_context(|| format!("reading configuration file '{}'", path.display())),
            }
        };

        let config: Self = toml::from_str(&text).with_context(|| format!("parsing configuration file '{}'", final_path.display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the API base is not an http(s) base URL or the user agent is blank
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.api_base.scheme(), "http" | "https") || self.api_base.cannot_be_a_base() {
            bail!("api_base must be an http(s) URL, got '{}'", self.api_base);
        }

        if self.user_agent.trim().is_empty() {
            bail!("user_agent must not be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
