//! `mdfmt format` command implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use mdfmt_renderer::MarkdownFormatter;
use mdfmt_writers::Writer;

use mdfmt_config::Config;

use super::{RenderArgs, files, formatter};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the format command.
#[derive(Args)]
pub(crate) struct FormatArgs {
    /// Markdown files to format (default: read stdin).
    files: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout.
    #[arg(short, long)]
    write: bool,

    #[command(flatten)]
    render: RenderArgs,
}

/// Reject settings whose output is not markdown, before files are rewritten.
fn require_plain_output(config: &Config) -> Result<(), CliError> {
    if config.render.terminal_styling {
        return Err(CliError::Validation(
            "--write cannot be combined with terminal styling".to_owned(),
        ));
    }
    Ok(())
}

/// What formatting a file in place did.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Rewritten,
    Unchanged,
}

impl FormatArgs {
    /// Execute the format command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a file cannot be read or
    /// written, or a document fails to render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.render.load_config()?;
        if self.write {
            require_plain_output(&config)?;
        }
        let formatter = formatter(&config);

        if self.files.is_empty() {
            if self.write {
                return Err(CliError::Validation(
                    "--write requires at least one file".to_owned(),
                ));
            }
            let source = io::read_to_string(io::stdin())?;
            let formatted = formatter.format(&source)?;
            return emit(&formatted);
        }

        let selected = files::select_reporting(&self.files, &config.files_resolved, &output);
        let mut rewritten = 0;
        for path in &selected {
            if self.write {
                if format_in_place(&formatter, path)? == Outcome::Rewritten {
                    output.info(&format!("Formatted {}", path.display()));
                    rewritten += 1;
                }
            } else {
                emit(&format_file(&formatter, path)?)?;
            }
        }

        if self.write {
            output.success(&format!(
                "{rewritten} of {} file(s) reformatted",
                selected.len()
            ));
        }
        Ok(())
    }
}

/// Format the file at `path` and return the rendered bytes.
fn format_file(formatter: &MarkdownFormatter, path: &Path) -> Result<Vec<u8>, CliError> {
    let source = files::read(path)?;
    formatter.format(&source).map_err(|source| CliError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite the file at `path` if its canonical form differs.
fn format_in_place(formatter: &MarkdownFormatter, path: &Path) -> Result<Outcome, CliError> {
    let source = files::read(path)?;
    let formatted = formatter.format(&source).map_err(|err| CliError::Format {
        path: path.to_path_buf(),
        source: err,
    })?;
    if formatted == source.as_bytes() {
        tracing::debug!(path = %path.display(), "Already formatted");
        return Ok(Outcome::Unchanged);
    }
    std::fs::write(path, &formatted).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Outcome::Rewritten)
}

/// Write rendered output to stdout.
fn emit(formatted: &[u8]) -> Result<(), CliError> {
    let mut stdout = mdfmt_writers::upgrade(io::stdout().lock());
    stdout.write_bytes(formatted)?;
    stdout.into_inner().flush()?;
    Ok(())
}
