//! Command handlers -- one module per subcommand

pub mod config;
pub mod learn;

use std::path::Path;

use tracing::debug;

use fieldlearn_core::config::FieldLearnConfig;

use crate::error::CliError;

/// Load the effective configuration for a command.
///
/// A missing file falls back to defaults with environment overrides applied.
/// Any other failure (parse error, invalid value) is reported.
pub async fn load_config(path: &Path) -> Result<FieldLearnConfig, CliError> {
    if tokio::fs::try_exists(path).await? {
        Ok(FieldLearnConfig::load(path).await?)
    } else {
        debug!(path = %path.display(), "config file not found, using defaults");
        let mut config = FieldLearnConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}
