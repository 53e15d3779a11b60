//! Configuration management for mdfmt.
//!
//! Parses `mdfmt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [render]
//! hard_wraps = false
//! terminal_styling = false
//!
//! [files]
//! extensions = ["md", "markdown"]
//! ignore = ["CHANGELOG.md", "${VENDOR_DIR:-vendor}", "~/notes/drafts"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Entries of `files.ignore` support environment variable expansion
//! (`${VAR}`, `${VAR:-default}`) and a leading `~`. Relative entries are
//! resolved against the directory holding the config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override hard line break rendering.
    pub hard_wraps: Option<bool>,
    /// Override ANSI emphasis styling.
    pub terminal_styling: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdfmt.toml";

/// Extensions formatted when `files.extensions` is not set.
const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderConfig,
    /// File selection (paths are relative strings from TOML).
    files: FilesConfigRaw,

    /// Resolved file selection (set after loading).
    #[serde(skip)]
    pub files_resolved: FilesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render soft line breaks as hard breaks.
    pub hard_wraps: bool,
    /// Render emphasis as ANSI escape sequences instead of delimiters.
    pub terminal_styling: bool,
}

/// Raw file selection as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FilesConfigRaw {
    extensions: Option<Vec<String>>,
    ignore: Option<Vec<String>>,
}

/// Resolved file selection with absolute ignore paths.
#[derive(Debug)]
pub struct FilesConfig {
    /// Extensions of files to format, without the leading dot.
    pub extensions: Vec<String>,
    /// Files and directories never formatted.
    pub ignore: Vec<PathBuf>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.map(str::to_owned).to_vec(),
            ignore: Vec::new(),
        }
    }
}

impl FilesConfig {
    /// Whether the file extension is one of the configured extensions.
    ///
    /// Comparison ignores ASCII case.
    #[must_use]
    pub fn has_markdown_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Whether the path is an ignored file or lies under an ignored directory.
    ///
    /// Ignore entries are absolute, so `path` should be absolute as well.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.iter().any(|ignored| path.starts_with(ignored))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`files.ignore`").
        field: String,
        /// Error message (e.g., "${`VENDOR_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdfmt.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(hard_wraps) = settings.hard_wraps {
            self.render.hard_wraps = hard_wraps;
        }
        if let Some(terminal_styling) = settings.terminal_styling {
            self.render.terminal_styling = terminal_styling;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before path resolution so `~` and absolute values survive the join
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files_resolved.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "files.extensions must list at least one extension".to_owned(),
            ));
        }
        for ext in &self.files_resolved.extensions {
            require_non_empty(ext, "files.extensions")?;
        }
        Ok(())
    }

    /// Expand environment variable references in path values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut ignore) = self.files.ignore {
            for entry in ignore.iter_mut() {
                *entry = expand::expand_path(entry, "files.ignore")?;
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and normalize extensions.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let extensions = match &self.files.extensions {
            Some(extensions) => extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_owned())
                .collect(),
            None => FilesConfig::default().extensions,
        };
        let ignore = self
            .files
            .ignore
            .iter()
            .flatten()
            .map(|entry| config_dir.join(entry))
            .collect();

        self.files_resolved = FilesConfig { extensions, ignore };
    }
}
