use std::collections::BTreeMap;

use coauthor_primitives::{CharIdx, CharLen, Range};
use smallvec::SmallVec;

use crate::error::AuthorshipError;
use crate::span::{AuthorSpan, UserId};

/// End and author of a stored span, keyed by its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot {
	pub(crate) to: CharIdx,
	pub(crate) user_id: UserId,
}

/// The set of authorship spans for one document.
///
/// Spans are disjoint: spans of different users never overlap, and spans of
/// the same user never overlap or touch (they are merged instead). Unauthored
/// text is simply not covered. Spans are indexed by their start, so the spans
/// an edit can affect are found in `O(log n + k)`.
///
/// The store only changes through [`map_through`](Self::map_through) and
/// [`reconcile`](crate::reconcile()).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorshipStore {
	pub(crate) spans: BTreeMap<CharIdx, Slot>,
	pub(crate) doc_len: CharLen,
}

impl AuthorshipStore {
	/// Creates an empty store for a document of `doc_len` characters.
	pub fn new(doc_len: CharLen) -> Self {
		Self {
			spans: BTreeMap::new(),
			doc_len,
		}
	}

	/// Creates a store from existing spans, later spans winning where they
	/// overlap earlier ones.
	///
	/// # Errors
	///
	/// Returns [`AuthorshipError::InvalidRange`] or
	/// [`AuthorshipError::EmptyUserId`] for the first unusable span.
	pub fn with_spans(
		doc_len: CharLen,
		spans: impl IntoIterator<Item = AuthorSpan>,
	) -> Result<Self, AuthorshipError> {
		let mut store = Self::new(doc_len);
		for span in spans {
			if span.from > span.to || span.to > doc_len {
				return Err(AuthorshipError::InvalidRange {
					from: span.from,
					to: span.to,
					doc_len,
				});
			}
			if span.user_id.is_empty() {
				return Err(AuthorshipError::EmptyUserId {
					from: span.from,
					to: span.to,
				});
			}
			store.paint(span);
		}
		Ok(store)
	}

	/// Returns the length of the document the spans refer to.
	pub fn doc_len(&self) -> CharLen {
		self.doc_len
	}

	/// Returns the number of spans.
	pub fn len(&self) -> usize {
		self.spans.len()
	}

	/// Returns true if no text is attributed.
	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}

	/// Iterates over all spans in document order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = AuthorSpan> + '_ {
		self.spans.iter().map(to_span)
	}

	/// Returns all spans in document order.
	pub fn to_vec(&self) -> Vec<AuthorSpan> {
		self.iter().collect()
	}

	/// Returns the author of the character at `pos`, if any.
	pub fn author_at(&self, pos: CharIdx) -> Option<&UserId> {
		self.spans
			.range(..=pos)
			.next_back()
			.filter(|(_, slot)| slot.to > pos)
			.map(|(_, slot)| &slot.user_id)
	}

	/// Iterates over spans that overlap `[from, to]` or touch either end.
	///
	/// These are the spans an update over `[from, to)` may extend, keep, or
	/// split. Only the last span starting before `from` can reach it, since
	/// spans are disjoint.
	pub fn touching(&self, from: CharIdx, to: CharIdx) -> impl Iterator<Item = AuthorSpan> + '_ {
		debug_assert!(from <= to);
		let before = self
			.spans
			.range(..from)
			.next_back()
			.filter(move |(_, slot)| slot.to >= from);
		before
			.into_iter()
			.chain(self.spans.range(from..=to.max(from)))
			.map(to_span)
	}

	/// Iterates over spans sharing at least one character with `range`.
	pub fn overlapping(&self, range: Range) -> impl Iterator<Item = AuthorSpan> + '_ {
		self.touching(range.from, range.to)
			.filter(move |span| span.range().overlaps(&range))
	}

	/// Checks the structural invariants: non-empty spans inside the document,
	/// sorted and disjoint, no touching same-author spans, no empty authors.
	pub fn is_well_formed(&self) -> bool {
		let mut prev: Option<AuthorSpan> = None;
		for span in self.iter() {
			if span.is_empty() || span.to > self.doc_len || span.user_id.is_empty() {
				return false;
			}
			if let Some(prev) = &prev
				&& (prev.to > span.from || (prev.to == span.from && prev.user_id == span.user_id))
			{
				return false;
			}
			prev = Some(span);
		}
		true
	}

	/// Removes the listed spans, then paints each addition in order.
	///
	/// Reconciliation calls this once per request, so a request's removals
	/// and additions land together.
	pub(crate) fn commit(
		&mut self,
		removed: &[CharIdx],
		added: impl IntoIterator<Item = AuthorSpan>,
	) {
		for from in removed {
			self.spans.remove(from);
		}
		for span in added {
			self.paint(span);
		}
	}

	/// Attributes `[span.from, span.to)` to `span.user_id`.
	///
	/// Spans of other authors are clipped around the painted range, and spans
	/// of the same author that overlap or touch it are absorbed.
	pub(crate) fn paint(&mut self, span: AuthorSpan) {
		if span.is_empty() {
			return;
		}

		let AuthorSpan {
			from: paint_from,
			to: paint_to,
			user_id,
		} = span;
		let (mut from, mut to) = (paint_from, paint_to);

		let hits: SmallVec<[AuthorSpan; 4]> = self.touching(paint_from, paint_to).collect();
		for hit in hits {
			if hit.user_id == user_id {
				self.spans.remove(&hit.from);
				from = from.min(hit.from);
				to = to.max(hit.to);
			} else if hit.from < paint_to && paint_from < hit.to {
				self.spans.remove(&hit.from);
				if hit.from < paint_from {
					self.insert_raw(hit.from, paint_from, hit.user_id.clone());
				}
				if paint_to < hit.to {
					self.insert_raw(paint_to, hit.to, hit.user_id);
				}
			}
		}

		self.insert_raw(from, to, user_id);
	}

	fn insert_raw(&mut self, from: CharIdx, to: CharIdx, user_id: UserId) {
		tracing::trace!(
			target: "coauthor::authorship",
			from,
			to,
			user = %user_id,
			"authorship.store.insert"
		);
		self.spans.insert(from, Slot { to, user_id });
	}
}

fn to_span((&from, slot): (&CharIdx, &Slot)) -> AuthorSpan {
	AuthorSpan {
		from,
		to: slot.to,
		user_id: slot.user_id.clone(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn fixture() -> AuthorshipStore {
		AuthorshipStore::with_spans(
			30,
			[
				AuthorSpan::new(0, 5, "u1"),
				AuthorSpan::new(5, 10, "u2"),
				AuthorSpan::new(14, 20, "u1"),
			],
		)
		.unwrap()
	}

	#[test]
	fn test_touching_includes_boundary_spans() {
		let store = fixture();
		let hits: Vec<_> = store.touching(10, 14).map(|s| s.from).collect();
		assert_eq!(hits, vec![5, 14]);

		let hits: Vec<_> = store.touching(5, 5).map(|s| s.from).collect();
		assert_eq!(hits, vec![0, 5]);

		assert_eq!(store.touching(11, 13).count(), 0);
	}

	#[test]
	fn test_overlapping_excludes_boundary_spans() {
		let store = fixture();
		let hits: Vec<_> = store
			.overlapping(Range::new(10, 14))
			.map(|s| s.from)
			.collect();
		assert!(hits.is_empty());

		let hits: Vec<_> = store
			.overlapping(Range::new(4, 15))
			.map(|s| s.from)
			.collect();
		assert_eq!(hits, vec![0, 5, 14]);
	}

	#[test]
	fn test_author_at() {
		let store = fixture();
		assert_eq!(store.author_at(0).map(UserId::as_str), Some("u1"));
		assert_eq!(store.author_at(5).map(UserId::as_str), Some("u2"));
		assert_eq!(store.author_at(10), None);
		assert_eq!(store.author_at(19).map(UserId::as_str), Some("u1"));
		assert_eq!(store.author_at(20), None);
	}

	#[test]
	fn test_paint_clips_other_authors() {
		let mut store = fixture();
		store.paint(AuthorSpan::new(3, 7, "u3"));
		assert_eq!(
			store.to_vec(),
			vec![
				AuthorSpan::new(0, 3, "u1"),
				AuthorSpan::new(3, 7, "u3"),
				AuthorSpan::new(7, 10, "u2"),
				AuthorSpan::new(14, 20, "u1"),
			]
		);
		assert!(store.is_well_formed());
	}

	#[test]
	fn test_paint_absorbs_same_author() {
		let mut store = fixture();
		store.paint(AuthorSpan::new(10, 14, "u1"));
		assert_eq!(
			store.to_vec(),
			vec![
				AuthorSpan::new(0, 5, "u1"),
				AuthorSpan::new(5, 10, "u2"),
				AuthorSpan::new(10, 20, "u1"),
			]
		);
	}

	#[test]
	fn test_paint_inside_other_author_splits_it() {
		let mut store = AuthorshipStore::with_spans(10, [AuthorSpan::new(0, 10, "u1")]).unwrap();
		store.paint(AuthorSpan::new(4, 6, "u2"));
		assert_eq!(
			store.to_vec(),
			vec![
				AuthorSpan::new(0, 4, "u1"),
				AuthorSpan::new(4, 6, "u2"),
				AuthorSpan::new(6, 10, "u1"),
			]
		);
	}

	#[test]
	fn test_paint_ignores_empty_span() {
		let mut store = fixture();
		store.paint(AuthorSpan::new(7, 7, "u3"));
		assert_eq!(store, fixture());
	}

	#[test]
	fn test_with_spans_validates() {
		assert_eq!(
			AuthorshipStore::with_spans(5, [AuthorSpan::new(2, 6, "u1")]),
			Err(AuthorshipError::InvalidRange {
				from: 2,
				to: 6,
				doc_len: 5
			})
		);
		assert_eq!(
			AuthorshipStore::with_spans(5, [AuthorSpan::new(1, 2, "")]),
			Err(AuthorshipError::EmptyUserId { from: 1, to: 2 })
		);
	}

	#[test]
	fn test_is_well_formed_rejects_touching_same_author() {
		let mut store = AuthorshipStore::new(10);
		store.spans.insert(
			0,
			Slot {
				to: 3,
				user_id: "u1".into(),
			},
		);
		store.spans.insert(
			3,
			Slot {
				to: 6,
				user_id: "u1".into(),
			},
		);
		assert!(!store.is_well_formed());
	}
}
