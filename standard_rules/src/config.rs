//! Story configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

/// Settings for playing a story. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Overrides the story's own title when set.
    pub title: Option<String>,

    /// Shown before each command.
    pub command_prompt: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Print transcript lines as they are said.
    pub echo: bool,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            title: None,
            command_prompt: ">".to_string(),
            log_filter: "info".to_string(),
            echo: false,
        }
    }
}

impl StoryConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoryConfig::default());
        assert_eq!(config.command_prompt, ">");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = StoryConfig::from_toml_str(
            r#"
            title = "Slightly Wrong"
            echo = true
            "#,
        )
        .unwrap();
        assert_eq!(config.title.as_deref(), Some("Slightly Wrong"));
        assert!(config.echo);
        assert_eq!(config.command_prompt, ">");
    }

    #[test]
    fn test_invalid_config() {
        let error = StoryConfig::from_toml_str("echo = \"loudly\"").unwrap_err();
        assert!(matches!(error, ConfigError::Toml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let error = StoryConfig::load(Path::new("/nonexistent/story.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
