use std::fmt;
use std::sync::Arc;

use coauthor_primitives::{CharIdx, CharLen, Range};
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a collaborator.
///
/// Cheap to clone: spans split and merge constantly, and each piece carries
/// its author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Arc<str>);

impl UserId {
	/// Creates a user identifier.
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true for the empty identifier, which is never tracked.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for UserId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for UserId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for UserId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

/// A half-open span `[from, to)` last authored by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSpan {
	/// Start of the span (inclusive).
	pub from: CharIdx,
	/// End of the span (exclusive).
	pub to: CharIdx,
	/// Author of the text in the span.
	pub user_id: UserId,
}

impl AuthorSpan {
	/// Creates a span.
	pub fn new(from: CharIdx, to: CharIdx, user_id: impl Into<UserId>) -> Self {
		Self {
			from,
			to,
			user_id: user_id.into(),
		}
	}

	/// Returns the character range covered by the span.
	pub fn range(&self) -> Range {
		Range::new(self.from, self.to)
	}

	/// Returns the span length in characters.
	pub fn len(&self) -> CharLen {
		self.to.saturating_sub(self.from)
	}

	/// Returns true if the span covers no characters.
	pub fn is_empty(&self) -> bool {
		self.from >= self.to
	}

	/// Returns true if this span covers all of `[from, to)`.
	pub fn covers(&self, from: CharIdx, to: CharIdx) -> bool {
		self.from <= from && to <= self.to
	}
}

impl fmt::Display for AuthorSpan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}@{}", self.from, self.to, self.user_id)
	}
}
