//! CLI error types.

use std::path::PathBuf;

use mdfmt_config::ConfigError;
use mdfmt_renderer::FormatError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("{0}")]
    Render(#[from] FormatError),

    #[error("{0} file(s) need formatting")]
    Unformatted(usize),

    #[error("{0}")]
    Validation(String),
}
