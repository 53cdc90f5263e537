//! CLI error types.

use togglebutton_config::ConfigError;
use togglebutton_site::{AppError, BuildError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("build finished with {0} problem(s) and --strict is set")]
    Strict(usize),
}
