use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError};

/// Starter config written by `hookload create`.
const STARTER_CONFIG: &str = r#"version: "1"
server: local

test:
  name: sample-webhook-test
  url: http://localhost:8080/process
  body: '{"payload": {"kind": "sample"}}'
  headers:
    Content-Type: application/json
  injectors:
    correlationIdInjector:
      path: body.meta.correlationId
    replyPathInjector:
      path: body.meta.replyTo
  pickers:
    correlationPicker:
      path: body.correlationId
  timeout: 30

run:
  iterations: 10
  durationSeconds: 10

outputs:
  - type: stdout
"#;

/// Writes a starter configuration file, creating parent directories.
///
/// # Errors
///
/// Returns an error when the file or its parent directories cannot be
/// written.
pub fn write_starter_config(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                AppError::config(ConfigError::WriteTemplate {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?;
        }
    }
    std::fs::write(path, STARTER_CONFIG).map_err(|err| {
        AppError::config(ConfigError::WriteTemplate {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    tracing::info!(path = %path.display(), "starter config written");
    Ok(())
}

#[cfg(test)]
pub(crate) const STARTER_CONFIG_FOR_TESTS: &str = STARTER_CONFIG;
