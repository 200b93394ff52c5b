//! Delivery of the rendered report to each configured output.

use std::path::Path;

use tracing::info;

use crate::config::types::{OutputConfig, OutputKind};
use crate::error::{AppError, AppResult, SinkError};

/// Writes the rendered report to every configured output in order.
///
/// Stdout outputs print the report as-is; text outputs write it to their
/// path, creating parent directories as needed. Outputs without a path have
/// been rejected during validation.
///
/// # Errors
///
/// Returns an error when a file output's directory cannot be created or the
/// file cannot be written.
pub async fn write_outputs(outputs: &[OutputConfig], report: &str) -> AppResult<()> {
    for output in outputs {
        match output.kind {
            OutputKind::Stdout => println!("{}", report),
            OutputKind::Text => {
                let Some(path) = output.path.as_deref() else {
                    continue;
                };
                write_text_file(Path::new(path), report).await?;
                info!(path, "report written");
            }
        }
    }
    Ok(())
}

async fn write_text_file(path: &Path, report: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                AppError::sink(SinkError::CreateDir {
                    path: parent.to_path_buf(),
                    source: err,
                })
            })?;
        }
    }
    tokio::fs::write(path, report).await.map_err(|err| {
        AppError::sink(SinkError::WriteFile {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
