use super::desc::{ChangeDesc, ChangeError, map_sections};
use super::types::{Bias, Insertion, Operation, Section, Tendril};
use crate::range::{CharIdx, CharLen};
use crate::{Rope, RopeSlice};

/// A sequence of operations representing a set of changes to a document.
///
/// ChangeSet represents document changes as a sequence of retain, delete, and
/// insert operations. It applies the changes to a [`Rope`] and maps positions
/// through them; a length-only [`ChangeDesc`] can be extracted for consumers
/// that only need to move offsets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	/// Sequence of retain/delete/insert operations.
	pub(super) changes: Vec<Operation>,
	/// Length of the source document before changes.
	pub(super) len: usize,
	/// Length of the document after applying changes.
	pub(super) len_after: usize,
}

impl ChangeSet {
	/// Creates a changeset that retains the whole of `doc`.
	pub fn identity(doc: RopeSlice) -> Self {
		let mut cs = Self::default();
		cs.retain(doc.len_chars());
		cs
	}

	/// Returns the length-only description of this changeset.
	pub fn desc(&self) -> ChangeDesc {
		ChangeDesc::from_sections(self.changes.iter().map(Section::from))
	}

	/// Adds a retain operation, preserving N characters from the source.
	///
	/// Consecutive retain operations are automatically merged.
	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Adds a delete operation, removing N characters from the source.
	///
	/// Consecutive delete operations are automatically merged.
	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Adds an insert operation, inserting text at the current position.
	///
	/// An insert always lands before a delete at the same position, so a
	/// replaced range reads as `Insert, Delete`.
	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text);
		self.len_after += ins.char_len();

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.push_str(&ins);
			}
			[.., last @ Operation::Delete(_)] => {
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies this changeset to a document, modifying it in place.
	///
	/// # Errors
	///
	/// Returns [`ChangeError::LengthMismatch`] without touching `doc` if the
	/// changeset was built for a document of a different length.
	pub fn apply(&self, doc: &mut Rope) -> Result<(), ChangeError> {
		if doc.len_chars() != self.len {
			return Err(ChangeError::LengthMismatch {
				expected: self.len,
				actual: doc.len_chars(),
			});
		}

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					pos += n;
				}
				Operation::Delete(n) => {
					doc.remove(pos..pos + n);
				}
				Operation::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
		Ok(())
	}

	/// Maps a position through this changeset using the specified bias.
	///
	/// Uses the same rules as [`ChangeDesc::map_pos`].
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		map_sections(self.changes.iter().map(Section::from), pos, bias)
	}
}
