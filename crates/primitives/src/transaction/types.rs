use crate::range::{CharIdx, CharLen};

/// Owned text carried by insert operations.
pub type Tendril = String;

/// Represents a single text change operation.
///
/// A change describes replacing the text range `[start, end)` with the optional
/// `replacement` text. If `replacement` is [`None`], this represents a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
	/// The starting character index of the change.
	pub start: CharIdx,
	/// The ending character index of the change (exclusive).
	pub end: CharIdx,
	/// The replacement text, or [`None`] for deletion.
	pub replacement: Option<Tendril>,
}

impl Change {
	/// Creates a change inserting `text` at `pos`.
	pub fn insert(pos: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start: pos,
			end: pos,
			replacement: Some(text.into()),
		}
	}

	/// Creates a change deleting `[start, end)`.
	pub fn delete(start: CharIdx, end: CharIdx) -> Self {
		Self {
			start,
			end,
			replacement: None,
		}
	}

	/// Creates a change replacing `[start, end)` with `text`.
	pub fn replace(start: CharIdx, end: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start,
			end,
			replacement: Some(text.into()),
		}
	}

	/// Returns the number of characters this change inserts.
	pub fn inserted_len(&self) -> CharLen {
		self.replacement
			.as_ref()
			.map_or(0, |text| text.chars().count())
	}
}

/// Bias determines how positions at change boundaries are mapped.
///
/// Only positions sitting exactly on a pure insertion point are affected:
/// `Left` keeps them before the inserted text, `Right` moves them past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before insertions at the same location.
	Left,
	/// Position moves after insertions at the same location.
	Right,
}

/// A text insertion with cached character length.
///
/// Fields are private to enforce the invariant that `char_len` always equals
/// `text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: Tendril,
	char_len: CharLen,
}

impl Insertion {
	/// Creates a new insertion, computing the character length once.
	#[inline]
	pub fn new(text: Tendril) -> Self {
		let char_len = text.chars().count();
		Self { text, char_len }
	}

	/// Returns the inserted text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the cached character length.
	#[inline]
	pub fn char_len(&self) -> CharLen {
		self.char_len
	}

	/// Appends text from another insertion, updating the cached length.
	pub(super) fn push_str(&mut self, other: &Insertion) {
		self.text.push_str(&other.text);
		self.char_len += other.char_len;
	}
}

/// A single operation in a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Retain the next N characters from the source document.
	Retain(CharLen),
	/// Delete the next N characters from the source document.
	Delete(CharLen),
	/// Insert new text at the current position.
	Insert(Insertion),
}

/// A length-only operation, as seen by position mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	/// Keep the next N characters.
	Retain(CharLen),
	/// Remove the next N characters.
	Delete(CharLen),
	/// Insert N characters at the current position.
	Insert(CharLen),
}

impl From<&Operation> for Section {
	fn from(op: &Operation) -> Self {
		match op {
			Operation::Retain(n) => Section::Retain(*n),
			Operation::Delete(n) => Section::Delete(*n),
			Operation::Insert(ins) => Section::Insert(ins.char_len()),
		}
	}
}

/// One replaced range of a document change: `[from, to)` in the old document
/// is replaced by `inserted_len` new characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Replacement {
	/// Start of the replaced range in the old document.
	pub from: CharIdx,
	/// End of the replaced range in the old document (exclusive).
	pub to: CharIdx,
	/// Number of characters inserted in place of `[from, to)`.
	pub inserted_len: CharLen,
}

impl Replacement {
	/// Creates a replacement of `[from, to)` by `inserted_len` characters.
	pub fn new(from: CharIdx, to: CharIdx, inserted_len: CharLen) -> Self {
		Self {
			from,
			to,
			inserted_len,
		}
	}

	/// A pure insertion of `len` characters at `pos`.
	pub fn insertion(pos: CharIdx, len: CharLen) -> Self {
		Self::new(pos, pos, len)
	}

	/// A pure deletion of `[from, to)`.
	pub fn deletion(from: CharIdx, to: CharIdx) -> Self {
		Self::new(from, to, 0)
	}
}
