//! `mdfmt check` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdfmt_renderer::MarkdownFormatter;

use super::{RenderArgs, canonical_formatter, files};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Unformatted`] if any file differs from its
    /// canonical form, or an error if a file cannot be read or rendered.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.render.load_config()?;
        let formatter = canonical_formatter(&config);

        let selected = files::select_reporting(&self.files, &config.files_resolved, &output);
        let mut unformatted = 0;
        for path in &selected {
            if !is_canonical(&formatter, path)? {
                output.warning(&format!("Would reformat {}", path.display()));
                unformatted += 1;
            }
        }

        if unformatted > 0 {
            return Err(CliError::Unformatted(unformatted));
        }
        output.success(&format!("{} file(s) already formatted", selected.len()));
        Ok(())
    }
}

/// Whether the file at `path` is already in canonical form.
fn is_canonical(formatter: &MarkdownFormatter, path: &Path) -> Result<bool, CliError> {
    let source = files::read(path)?;
    let formatted = formatter.format(&source).map_err(|err| CliError::Format {
        path: path.to_path_buf(),
        source: err,
    })?;
    Ok(formatted == source.as_bytes())
}
