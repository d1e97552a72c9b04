use crate::core::models::BuildContext;
use crate::utils::{CssBundleError, Logger, Result};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "css-bundle.config.json";

/// Loads the build context from `css-bundle.config.json`
pub struct ConfigLoader;

impl ConfigLoader {
    /// Searches for css-bundle.config.json in the project root.
    /// Relative output directories are resolved against `root`.
    pub fn load_from_file(root: &Path) -> Result<Option<BuildContext>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path).map_err(CssBundleError::Io)?;

        let mut context: BuildContext = serde_json::from_str(&content).map_err(|e| {
            CssBundleError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })?;

        if context.assets_build_directory.is_relative() {
            context.assets_build_directory = root.join(&context.assets_build_directory);
        }

        Ok(Some(context))
    }
}
