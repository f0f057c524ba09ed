use coauthor_primitives::{Bias, ChangeDesc, CharIdx, CharLen};
use serde::{Deserialize, Serialize};

use crate::error::AuthorshipError;
use crate::span::UserId;

/// A request stating that the text in `[from, to)` was just authored by
/// `user_id`.
///
/// Offsets are in the coordinates of the document after the change that
/// carried the edit. `local_update` marks edits typed at this client as
/// opposed to edits replayed from a remote peer; it only changes how a
/// touching boundary with another author's span is classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorshipUpdate {
	/// Start of the authored text.
	pub from: CharIdx,
	/// End of the authored text (exclusive).
	pub to: CharIdx,
	/// Author of the text.
	pub user_id: UserId,
	/// Whether the edit originated at this client.
	#[serde(default)]
	pub local_update: bool,
}

impl AuthorshipUpdate {
	/// Creates an update request.
	pub fn new(
		from: CharIdx,
		to: CharIdx,
		user_id: impl Into<UserId>,
		local_update: bool,
	) -> Self {
		Self {
			from,
			to,
			user_id: user_id.into(),
			local_update,
		}
	}

	/// An edit typed at this client.
	pub fn local(from: CharIdx, to: CharIdx, user_id: impl Into<UserId>) -> Self {
		Self::new(from, to, user_id, true)
	}

	/// An edit replayed from a remote peer.
	pub fn remote(from: CharIdx, to: CharIdx, user_id: impl Into<UserId>) -> Self {
		Self::new(from, to, user_id, false)
	}

	/// Returns the number of authored characters.
	pub fn len(&self) -> CharLen {
		self.to.saturating_sub(self.from)
	}

	/// Returns true if the request covers no characters.
	pub fn is_empty(&self) -> bool {
		self.from >= self.to
	}

	/// Checks the request against a document of `doc_len` characters.
	///
	/// # Errors
	///
	/// [`AuthorshipError::InvalidRange`] if `from > to` or `to > doc_len`, and
	/// [`AuthorshipError::EmptyUserId`] if the request names no author.
	pub fn validate(&self, doc_len: CharLen) -> Result<(), AuthorshipError> {
		if self.from > self.to || self.to > doc_len {
			return Err(AuthorshipError::InvalidRange {
				from: self.from,
				to: self.to,
				doc_len,
			});
		}
		if self.user_id.is_empty() {
			return Err(AuthorshipError::EmptyUserId {
				from: self.from,
				to: self.to,
			});
		}
		Ok(())
	}

	/// Returns this request with both offsets moved through `changes`.
	///
	/// Used for requests that were queued before a change was applied. Both
	/// ends stay before text inserted exactly at them.
	pub fn map_through(&self, changes: &ChangeDesc) -> Self {
		Self {
			from: changes.map_pos(self.from, Bias::Left),
			to: changes.map_pos(self.to, Bias::Left),
			..self.clone()
		}
	}
}
