use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::loader::file_to_config;
use crate::config::types::ServiceConfig;

/// Load the optional config file; no path means built-in defaults.
pub async fn run(config_path: Option<&str>) -> Result<ServiceConfig> {
    match config_path {
        Some(config_path) => file_to_config(Path::new(config_path))
            .await
            .map_err(|e| anyhow!("Invalid config format: {:#}", e)),
        None => Ok(ServiceConfig::default()),
    }
}
