//! Documentation build configuration (`shelldoc.toml`) parsing and validation.
//!
//! ```toml
//! [project]
//! title = "Cinnamon JS"
//!
//! [paths]
//! input = "js/ui"
//! markup = "docs/xml"
//! output = "docs/html"
//! stylesheet = "docs/custom.css"
//!
//! [source]
//! extensions = ["js"]
//! ```
//!
//! Every section and field is optional. Relative paths are resolved against
//! the directory holding the configuration file. Without a `[source]`
//! section only `.js` files are documented; `extensions = []` takes every
//! file in the input directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up by the CLI.
pub const CONFIG_FILE: &str = "shelldoc.toml";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("project title must not be empty")]
    EmptyTitle,

    #[error("source extension {0} is empty")]
    EmptyExtension(usize),
}

/// The complete shelldoc.toml configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Which files in the input directory are documented.
    #[serde(default)]
    pub source: SourceConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Project metadata section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Title of the documentation set, shown on every page.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

fn default_title() -> String {
    "Documentation".to_string()
}

/// Paths section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory of source files.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Directory for intermediate markup.
    #[serde(default = "default_markup")]
    pub markup: PathBuf,

    /// Directory for HTML pages.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Custom stylesheet replacing the built-in one.
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            markup: default_markup(),
            output: default_output(),
            stylesheet: None,
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from(".")
}

fn default_markup() -> PathBuf {
    PathBuf::from("doc/xml")
}

fn default_output() -> PathBuf {
    PathBuf::from("doc/html")
}

/// Source selection section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// File extensions to document, without the dot. Empty means all files.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string()]
}

impl DocConfig {
    /// Load a configuration from a file path.
    ///
    /// Relative paths in the file are resolved against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if let Some(index) = self
            .source
            .extensions
            .iter()
            .position(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::EmptyExtension(index));
        }
        Ok(())
    }

    /// Source directory, resolved.
    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.paths.input)
    }

    /// Markup directory, resolved.
    pub fn markup_dir(&self) -> PathBuf {
        self.resolve(&self.paths.markup)
    }

    /// Page directory, resolved.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }

    /// Custom stylesheet, resolved.
    pub fn stylesheet(&self) -> Option<PathBuf> {
        self.paths.stylesheet.as_ref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Whether `path` has one of the configured extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        if self.source.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.source
                    .extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.') == ext)
            })
    }
}
