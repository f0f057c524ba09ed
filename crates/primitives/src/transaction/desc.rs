use thiserror::Error;

use super::types::{Bias, Replacement, Section};
use crate::range::{CharIdx, CharLen};

/// Errors raised when a change cannot be built or applied to a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeError {
	/// A replacement reaches past the end of the document, or is reversed.
	#[error("replacement {from}..{to} is out of bounds for a document of length {len}")]
	OutOfBounds {
		/// Start of the offending replacement.
		from: CharIdx,
		/// End of the offending replacement.
		to: CharIdx,
		/// Length of the document the change was built against.
		len: CharLen,
	},
	/// Replacements must be sorted and must not overlap.
	#[error("replacement {from}..{to} starts before the previous one ends at {prev_end}")]
	Unordered {
		/// Start of the offending replacement.
		from: CharIdx,
		/// End of the offending replacement.
		to: CharIdx,
		/// End of the preceding replacement.
		prev_end: CharIdx,
	},
	/// The change was built for a document of a different length.
	#[error("change expects a document of length {expected}, got {actual}")]
	LengthMismatch {
		/// Length the change applies to.
		expected: CharLen,
		/// Length of the document it was applied to.
		actual: CharLen,
	},
}

/// A length-only description of a document change.
///
/// This carries exactly what position mapping needs and nothing else: how many
/// characters are kept, removed, and inserted, in document order. A
/// [`ChangeSet`](super::ChangeSet) produces one through
/// [`desc`](super::ChangeSet::desc), and hosts that only report
/// `{from, to, inserted_len}` replacements build one with
/// [`ChangeDesc::from_replacements`]. Both paths share [`map_sections`], so
/// mapped positions agree with the text the change produces.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeDesc {
	sections: Vec<Section>,
	len: CharLen,
	len_after: CharLen,
}

impl ChangeDesc {
	/// Returns a change that leaves a document of length `len` untouched.
	pub fn identity(len: CharLen) -> Self {
		let mut desc = Self::default();
		desc.retain(len);
		desc
	}

	/// Builds a change from sorted, non-overlapping replacements against a
	/// document of length `doc_len`.
	///
	/// # Errors
	///
	/// Returns [`ChangeError::OutOfBounds`] if a replacement is reversed or ends
	/// past `doc_len`, and [`ChangeError::Unordered`] if replacements overlap or
	/// are not sorted by position.
	pub fn from_replacements(
		doc_len: CharLen,
		replacements: impl IntoIterator<Item = Replacement>,
	) -> Result<Self, ChangeError> {
		let mut desc = Self::default();
		let mut last = 0;

		for Replacement {
			from,
			to,
			inserted_len,
		} in replacements
		{
			if from > to || to > doc_len {
				return Err(ChangeError::OutOfBounds {
					from,
					to,
					len: doc_len,
				});
			}
			if from < last {
				return Err(ChangeError::Unordered {
					from,
					to,
					prev_end: last,
				});
			}
			desc.retain(from - last);
			desc.insert(inserted_len);
			desc.delete(to - from);
			last = to;
		}

		desc.retain(doc_len - last);
		Ok(desc)
	}

	pub(super) fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
		let mut desc = Self::default();
		for section in sections {
			match section {
				Section::Retain(n) => desc.retain(n),
				Section::Delete(n) => desc.delete(n),
				Section::Insert(n) => desc.insert(n),
			}
		}
		desc
	}

	/// Returns the length of the source document (before changes).
	pub fn len(&self) -> CharLen {
		self.len
	}

	/// Returns the length of the document after applying changes.
	pub fn len_after(&self) -> CharLen {
		self.len_after
	}

	/// Returns true if the change neither deletes nor inserts anything.
	pub fn is_identity(&self) -> bool {
		self.sections
			.iter()
			.all(|section| matches!(section, Section::Retain(_)))
	}

	/// Returns the replaced ranges of this change in old-document coordinates.
	pub fn replacements(&self) -> impl Iterator<Item = Replacement> + '_ {
		let mut pos = 0;
		let mut pending: Option<Replacement> = None;
		let mut sections = self.sections.iter();

		std::iter::from_fn(move || {
			for section in sections.by_ref() {
				match *section {
					Section::Retain(n) => {
						pos += n;
						if let Some(done) = pending.take() {
							return Some(done);
						}
					}
					Section::Delete(n) => {
						let rep = pending.get_or_insert(Replacement::new(pos, pos, 0));
						rep.to += n;
						pos += n;
					}
					Section::Insert(n) => {
						pending
							.get_or_insert(Replacement::new(pos, pos, 0))
							.inserted_len += n;
					}
				}
			}
			pending.take()
		})
	}

	/// Maps a position through this change using the specified bias.
	///
	/// Positions before a replaced range are unchanged, positions strictly
	/// inside one collapse to the start of its replacement, and positions at or
	/// after its end shift by the replacement's length delta. `bias` only
	/// matters for a position sitting exactly on a pure insertion.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		map_sections(self.sections.iter().copied(), pos, bias)
	}

	fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		self.len_after += n;
		if let Some(Section::Retain(count)) = self.sections.last_mut() {
			*count += n;
		} else {
			self.sections.push(Section::Retain(n));
		}
	}

	fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len += n;
		if let Some(Section::Delete(count)) = self.sections.last_mut() {
			*count += n;
		} else {
			self.sections.push(Section::Delete(n));
		}
	}

	fn insert(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}
		self.len_after += n;
		match self.sections.as_mut_slice() {
			[.., Section::Insert(prev)] | [.., Section::Insert(prev), Section::Delete(_)] => {
				*prev += n;
			}
			[.., last @ Section::Delete(_)] => {
				let del = std::mem::replace(last, Section::Insert(n));
				self.sections.push(del);
			}
			_ => self.sections.push(Section::Insert(n)),
		}
	}
}

/// Maps `pos` through a sequence of length-only operations.
///
/// Consecutive insert/delete operations form one replaced range. A position at
/// the start of a range that deletes text stays put, a position inside it
/// collapses to the start of the replacement, and a position at a pure
/// insertion point follows `bias`.
pub(crate) fn map_sections(
	sections: impl Iterator<Item = Section>,
	pos: CharIdx,
	bias: Bias,
) -> CharIdx {
	let mut old_pos = 0;
	let mut new_pos = 0;
	let mut sections = sections.peekable();

	while let Some(section) = sections.next() {
		if old_pos > pos {
			break;
		}

		let (mut deleted, mut inserted) = match section {
			Section::Retain(n) => {
				if old_pos + n > pos {
					return new_pos + (pos - old_pos);
				}
				old_pos += n;
				new_pos += n;
				continue;
			}
			Section::Delete(n) => (n, 0),
			Section::Insert(n) => (0, n),
		};

		while let Some(next) = sections.next_if(|s| !matches!(s, Section::Retain(_))) {
			match next {
				Section::Delete(n) => deleted += n,
				Section::Insert(n) => inserted += n,
				Section::Retain(_) => unreachable!(),
			}
		}

		if deleted == 0 {
			if old_pos == pos && bias == Bias::Left {
				return new_pos;
			}
		} else if pos < old_pos + deleted {
			return new_pos;
		}
		old_pos += deleted;
		new_pos += inserted;
	}

	new_pos + pos.saturating_sub(old_pos)
}
