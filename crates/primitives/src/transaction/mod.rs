//! Document changes and position mapping.
//!
//! A [`Transaction`] wraps a [`ChangeSet`] built from a list of [`Change`]s. The
//! change set applies text to a [`Rope`](crate::Rope); its [`ChangeDesc`] moves
//! offsets held elsewhere (authorship spans, queued requests) with exactly the
//! same rules, so the two never drift apart.

mod changeset;
mod desc;
mod types;

pub use changeset::ChangeSet;
pub use desc::{ChangeDesc, ChangeError};
pub use types::{Bias, Change, Insertion, Operation, Replacement, Section, Tendril};

use crate::range::CharIdx;
use crate::{Rope, RopeSlice};

/// A set of document changes applied as one unit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transaction {
	changes: ChangeSet,
}

impl Transaction {
	/// Builds a transaction from sorted, non-overlapping changes against `doc`.
	///
	/// # Errors
	///
	/// Returns [`ChangeError::OutOfBounds`] for reversed changes or changes past
	/// the end of `doc`, and [`ChangeError::Unordered`] for overlapping or
	/// unsorted changes.
	pub fn change(
		doc: RopeSlice,
		changes: impl IntoIterator<Item = Change>,
	) -> Result<Self, ChangeError> {
		let len = doc.len_chars();
		let mut cs = ChangeSet::default();
		let mut last = 0;

		for Change {
			start,
			end,
			replacement,
		} in changes
		{
			if start > end || end > len {
				return Err(ChangeError::OutOfBounds {
					from: start,
					to: end,
					len,
				});
			}
			if start < last {
				return Err(ChangeError::Unordered {
					from: start,
					to: end,
					prev_end: last,
				});
			}
			cs.retain(start - last);
			if let Some(text) = replacement {
				cs.insert(text);
			}
			cs.delete(end - start);
			last = end;
		}

		cs.retain(len - last);
		Ok(Self { changes: cs })
	}

	/// Builds a transaction inserting `text` at `pos`.
	pub fn insert(doc: RopeSlice, pos: CharIdx, text: impl Into<Tendril>) -> Result<Self, ChangeError> {
		Self::change(doc, [Change::insert(pos, text)])
	}

	/// Builds a transaction deleting `[from, to)`.
	pub fn delete(doc: RopeSlice, from: CharIdx, to: CharIdx) -> Result<Self, ChangeError> {
		Self::change(doc, [Change::delete(from, to)])
	}

	/// A transaction that changes nothing in `doc`.
	pub fn identity(doc: RopeSlice) -> Self {
		Self {
			changes: ChangeSet::identity(doc),
		}
	}

	/// Returns the underlying change set.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Returns the length-only description of this transaction's changes.
	pub fn desc(&self) -> ChangeDesc {
		self.changes.desc()
	}

	/// Applies the changes to `doc`.
	pub fn apply(&self, doc: &mut Rope) -> Result<(), ChangeError> {
		self.changes.apply(doc)
	}
}
