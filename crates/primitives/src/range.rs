/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for authorship spans and change sets.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A half-open character range `[from, to)`.
///
/// Construction normalizes the endpoints so that `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Range {
	/// Start of the range (inclusive).
	pub from: CharIdx,
	/// End of the range (exclusive).
	pub to: CharIdx,
}

impl Range {
	/// Creates a range covering `[min(a, b), max(a, b))`.
	pub fn new(a: CharIdx, b: CharIdx) -> Self {
		Self {
			from: std::cmp::min(a, b),
			to: std::cmp::max(a, b),
		}
	}

	/// Returns true if the two ranges share at least one character.
	pub fn overlaps(&self, other: &Range) -> bool {
		self.from < other.to && other.from < self.to
	}
}
