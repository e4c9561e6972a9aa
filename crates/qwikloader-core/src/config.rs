//! Loader configuration
//!
//! Options can be built in code or read from a TOML file:
//!
//! ```toml
//! resume-event = "q-resume"
//! events = ["click", "input"]
//! discover-events = true
//!
//! [attributes]
//! container = "q:container"
//! base = "q:base"
//! event-prefix = "on:"
//! prefetch = "q:prefetch"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the options file
    #[error("Failed to read loader options: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse loader options: {0}")]
    Parse(#[from] toml::de::Error),

    /// Options parsed but are unusable
    #[error("Invalid loader options: {0}")]
    Invalid(String),
}

/// Attribute names the loader reads from the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AttributeNames {
    /// Marks a container boundary
    pub container: String,
    /// Base URL of a container boundary
    pub base: String,
    /// Prefix of delegated handler attributes (`on:click`)
    pub event_prefix: String,
    /// Newline separated prefetch list
    pub prefetch: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            container: "q:container".to_string(),
            base: "q:base".to_string(),
            event_prefix: "on:".to_string(),
            prefetch: "q:prefetch".to_string(),
        }
    }
}

/// Loader options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoaderOptions {
    /// Attribute names
    pub attributes: AttributeNames,

    /// Synthetic event fired on resumable nodes
    pub resume_event: String,

    /// Event types armed at initialization
    pub events: Vec<String>,

    /// Scan the document for handler attributes at initialization
    pub discover_events: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            attributes: AttributeNames::default(),
            resume_event: "q-resume".to_string(),
            events: Vec::new(),
            discover_events: true,
        }
    }
}

impl LoaderOptions {
    /// Parse options from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: LoaderOptions = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check that every attribute name and event type is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let attrs = &self.attributes;
        for (field, value) in [
            ("attributes.container", &attrs.container),
            ("attributes.base", &attrs.base),
            ("attributes.event-prefix", &attrs.event_prefix),
            ("attributes.prefetch", &attrs.prefetch),
            ("resume-event", &self.resume_event),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
            }
        }

        if let Some(bad) = self
            .events
            .iter()
            .find(|e| e.is_empty() || e.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::Invalid(format!(
                "event type '{}' must be a non-empty word",
                bad
            )));
        }

        Ok(())
    }

    /// Handler attribute name for an event type (`on:click`)
    pub fn handler_attribute(&self, event_type: &str) -> String {
        format!("{}{}", self.attributes.event_prefix, event_type)
    }

    /// Marker attribute of resumable nodes (`on:q-resume`)
    pub fn resume_attribute(&self) -> String {
        self.handler_attribute(&self.resume_event)
    }

    /// Event type named by a handler attribute, if it is one
    pub fn event_type_of<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        attribute
            .strip_prefix(self.attributes.event_prefix.as_str())
            .filter(|event_type| !event_type.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = LoaderOptions::default();
        assert_eq!(options.attributes.container, "q:container");
        assert_eq!(options.attributes.base, "q:base");
        assert_eq!(options.resume_attribute(), "on:q-resume");
        assert_eq!(options.handler_attribute("click"), "on:click");
        assert!(options.discover_events);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let options = LoaderOptions::from_toml_str(
            r#"
            events = ["click", "keydown"]
            discover-events = false

            [attributes]
            base = "data-base"
            "#,
        )
        .unwrap();

        assert_eq!(options.events, vec!["click", "keydown"]);
        assert!(!options.discover_events);
        assert_eq!(options.attributes.base, "data-base");
        // Unset fields keep their defaults
        assert_eq!(options.attributes.container, "q:container");
        assert_eq!(options.resume_event, "q-resume");
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let result = LoaderOptions::from_toml_str(
            r#"
            [attributes]
            event-prefix = ""
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_event_type() {
        let result = LoaderOptions::from_toml_str(r#"events = ["click me"]"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = LoaderOptions::from_toml_str("events = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resume-event = \"q-wake\"").unwrap();

        let options = LoaderOptions::from_file(file.path()).unwrap();
        assert_eq!(options.resume_attribute(), "on:q-wake");
    }

    #[test]
    fn test_missing_file() {
        let result = LoaderOptions::from_file(Path::new("/nonexistent/qwikloader.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_event_type_of() {
        let options = LoaderOptions::default();
        assert_eq!(options.event_type_of("on:click"), Some("click"));
        assert_eq!(options.event_type_of("on:"), None);
        assert_eq!(options.event_type_of("q:base"), None);
    }
}
