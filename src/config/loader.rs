use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::InputConfig;

/// Loads a raw configuration file, decoded as YAML or JSON by extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read, carries an unsupported
/// extension, or fails to decode.
pub fn load_config(path: &Path) -> AppResult<InputConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
