use std::path::PathBuf;

use coauthor_primitives::{ChangeError, CharIdx, CharLen};
use thiserror::Error;

/// Errors raised by the mapping and reconciliation pipeline.
///
/// Every variant is raised before the store is touched, so a failed call
/// leaves the store exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorshipError {
	/// An update request is reversed or reaches past the end of the document.
	#[error("invalid authorship range {from}..{to} for a document of length {doc_len}")]
	InvalidRange {
		/// Start of the request.
		from: CharIdx,
		/// End of the request.
		to: CharIdx,
		/// Length of the document the store describes.
		doc_len: CharLen,
	},

	/// An update request names no author.
	#[error("authorship update {from}..{to} has an empty user id")]
	EmptyUserId {
		/// Start of the request.
		from: CharIdx,
		/// End of the request.
		to: CharIdx,
	},

	/// A document change could not be applied to the store or document.
	#[error("cannot map authorship through change: {0}")]
	UnknownChangeMapping(#[from] ChangeError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A field holds a value that cannot be used.
	#[error("invalid value for '{field}': {reason}")]
	InvalidValue {
		/// The offending key.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}
