//! Authorship configuration.
//!
//! ```toml
//! marker-class = "authorship-highlight"
//! user-attribute = "data-user-id"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::marker::{DEFAULT_MARKER_CLASS, DEFAULT_USER_ATTRIBUTE, MarkerStyle};

/// Rendering settings for authorship highlights.
///
/// Missing keys fall back to their defaults; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AuthorshipConfig {
	/// Class applied to every authorship marker.
	pub marker_class: String,
	/// Marker attribute that carries the author's user id.
	pub user_attribute: String,
}

impl Default for AuthorshipConfig {
	fn default() -> Self {
		Self {
			marker_class: DEFAULT_MARKER_CLASS.to_string(),
			user_attribute: DEFAULT_USER_ATTRIBUTE.to_string(),
		}
	}
}

impl AuthorshipConfig {
	/// Parses configuration from TOML source.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let src = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&src)
	}

	/// Returns the marker projection described by this configuration.
	pub fn marker_style(&self) -> MarkerStyle {
		MarkerStyle {
			class: self.marker_class.clone(),
			user_attribute: self.user_attribute.clone(),
		}
	}

	fn validate(&self) -> Result<(), ConfigError> {
		for (field, value) in [
			("marker-class", &self.marker_class),
			("user-attribute", &self.user_attribute),
		] {
			if value.is_empty() {
				return Err(ConfigError::InvalidValue {
					field,
					reason: "must not be empty".into(),
				});
			}
			if value.chars().any(char::is_whitespace) {
				return Err(ConfigError::InvalidValue {
					field,
					reason: format!("'{value}' must not contain whitespace"),
				});
			}
		}
		Ok(())
	}
}
