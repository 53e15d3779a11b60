//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod format;
mod files;

use std::path::PathBuf;

use clap::Args;
use mdfmt_config::{CliSettings, Config};
use mdfmt_renderer::MarkdownFormatter;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use format::FormatArgs;

/// Options shared by every command that renders markdown.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to configuration file (default: auto-discover mdfmt.toml).
    #[arg(short, long, env = "MDFMT_CONFIG")]
    config: Option<PathBuf>,

    /// Render soft line breaks as hard breaks (overrides config).
    #[arg(long)]
    hard_wraps: bool,

    /// Render emphasis with ANSI escape sequences (overrides config).
    #[arg(long)]
    terminal: bool,
}

impl RenderArgs {
    /// Load the configuration with these flags applied on top.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            hard_wraps: self.hard_wraps.then_some(true),
            terminal_styling: self.terminal.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(config)
    }
}

/// Build the formatter described by the render section of `config`.
fn formatter(config: &Config) -> MarkdownFormatter {
    MarkdownFormatter::new()
        .with_hard_wraps(config.render.hard_wraps)
        .with_terminal_styling(config.render.terminal_styling)
}

/// Formatter whose output is plain markdown, for comparing against files.
fn canonical_formatter(config: &Config) -> MarkdownFormatter {
    formatter(config).with_terminal_styling(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_follows_render_config() {
        let mut config = Config::default();
        config.render.hard_wraps = true;
        config.render.terminal_styling = true;

        let options = formatter(&config).options();

        assert!(options.hard_wraps);
        assert!(options.terminal_styling);
    }

    #[test]
    fn test_canonical_formatter_drops_terminal_styling() {
        let mut config = Config::default();
        config.render.hard_wraps = true;
        config.render.terminal_styling = true;

        let options = canonical_formatter(&config).options();

        assert!(options.hard_wraps);
        assert!(!options.terminal_styling);
    }
}
