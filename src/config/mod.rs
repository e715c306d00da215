//! Runtime configuration: API location, user agent, feature switches, and thresholds.

#[expect(clippy::module_inception, reason = "I like it this way")]
mod config;
mod features;

pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
pub use features::Features;
