//! Configuration management for marklet.
//!
//! Parses `marklet.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section is
//! optional:
//!
//! ```toml
//! [render]
//! safe_links = false
//! syntax_highlighting = false
//!
//! [stream]
//! chunk_size = 8192
//!
//! [output]
//! standalone = false
//! title = "Document"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override link-safety mode.
    pub safe_links: Option<bool>,
    /// Override syntax highlighting.
    pub syntax_highlighting: Option<bool>,
    /// Override streaming chunk size.
    pub chunk_size: Option<usize>,
    /// Override standalone document output.
    pub standalone: Option<bool>,
    /// Override the standalone document title.
    pub title: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "marklet.toml";

/// Largest accepted `stream.chunk_size`.
const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderConfig,
    /// Streaming options.
    pub stream: StreamConfig,
    /// Output document options.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Open links in a new tab with `rel="noopener noreferrer"`.
    pub safe_links: bool,
    /// Highlight fenced code blocks with a known language.
    pub syntax_highlighting: bool,
}

/// Streaming configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bytes read per chunk.
    pub chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { chunk_size: 8192 }
    }
}

/// Output document configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap rendered HTML in a minimal HTML5 document.
    pub standalone: bool,
    /// Document title used when standalone.
    pub title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: "Document".to_owned(),
        }
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `marklet.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
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

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(safe_links) = settings.safe_links {
            self.render.safe_links = safe_links;
        }
        if let Some(syntax_highlighting) = settings.syntax_highlighting {
            self.render.syntax_highlighting = syntax_highlighting;
        }
        if let Some(chunk_size) = settings.chunk_size {
            self.stream.chunk_size = chunk_size;
        }
        if let Some(standalone) = settings.standalone {
            self.output.standalone = standalone;
        }
        if let Some(title) = &settings.title {
            self.output.title.clone_from(title);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
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
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_stream()?;
        require_non_empty(&self.output.title, "output.title")?;
        Ok(())
    }

    /// Validate streaming configuration.
    fn validate_stream(&self) -> Result<(), ConfigError> {
        let chunk_size = self.stream.chunk_size;
        if chunk_size == 0 {
            return Err(ConfigError::Validation(
                "stream.chunk_size must be greater than 0".to_owned(),
            ));
        }
        if chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Validation(format!(
                "stream.chunk_size cannot exceed {MAX_CHUNK_SIZE}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.render.safe_links);
        assert!(!config.render.syntax_highlighting);
        assert_eq!(config.stream.chunk_size, 8192);
        assert!(!config.output.standalone);
        assert_eq!(config.output.title, "Document");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.stream.chunk_size, 8192);
        assert_eq!(config.output.title, "Document");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[render]
safe_links = true
syntax_highlighting = true

[stream]
chunk_size = 1024

[output]
standalone = true
title = "Notes"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.render.safe_links);
        assert!(config.render.syntax_highlighting);
        assert_eq!(config.stream.chunk_size, 1024);
        assert!(config.output.standalone);
        assert_eq!(config.output.title, "Notes");
    }

    #[test]
    fn test_parse_partial_section_keeps_defaults() {
        let toml = r"
[output]
standalone = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.output.standalone);
        assert_eq!(config.output.title, "Document");
    }

    #[test]
    fn test_parse_invalid_type() {
        let toml = r#"
[stream]
chunk_size = "big"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default();
        let settings = CliSettings {
            safe_links: Some(true),
            chunk_size: Some(64),
            title: Some("CLI".to_owned()),
            ..Default::default()
        };
        config.apply_cli_settings(&settings);

        assert!(config.render.safe_links);
        assert!(!config.render.syntax_highlighting);
        assert_eq!(config.stream.chunk_size, 64);
        assert_eq!(config.output.title, "CLI");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.stream.chunk_size, 8192);
        assert_eq!(config.output.title, "Document");
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_chunk_size_zero() {
        let mut config = Config::default();
        config.stream.chunk_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stream.chunk_size"));
    }

    #[test]
    fn test_validate_chunk_size_too_large() {
        let mut config = Config::default();
        config.stream.chunk_size = MAX_CHUNK_SIZE + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.stream.chunk_size = MAX_CHUNK_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        let mut config = Config::default();
        config.output.title = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: output.title cannot be empty");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[render]\nsafe_links = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(config.render.safe_links);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref missing) if *missing == path));
    }

    #[test]
    fn test_load_applies_cli_settings_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[stream]\nchunk_size = 10\n").unwrap();

        let settings = CliSettings {
            chunk_size: Some(20),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.stream.chunk_size, 20);
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            chunk_size: Some(0),
            ..Default::default()
        };
        assert!(Config::load(Some(&path), Some(&settings)).is_err());
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(config_path));
    }
}
