use std::collections::BTreeMap;

use coauthor_primitives::{Bias, ChangeDesc, ChangeError, ChangeSet};

use crate::error::AuthorshipError;
use crate::store::{AuthorshipStore, Slot};

impl AuthorshipStore {
	/// Moves every span through a document change.
	///
	/// Span starts map with [`Bias::Right`] and ends with [`Bias::Left`], so
	/// text inserted exactly at a span edge is left unattributed until an
	/// update claims it, while text inserted strictly inside a span grows it.
	/// Spans that collapse to nothing are dropped, and same-author spans that
	/// end up touching are merged.
	///
	/// # Errors
	///
	/// Returns [`AuthorshipError::UnknownChangeMapping`] if the change was
	/// built for a document of a different length. The store is unchanged.
	pub fn map_through(&mut self, changes: &ChangeDesc) -> Result<(), AuthorshipError> {
		if changes.len() != self.doc_len {
			return Err(ChangeError::LengthMismatch {
				expected: changes.len(),
				actual: self.doc_len,
			}
			.into());
		}
		if changes.is_identity() {
			return Ok(());
		}

		let mut mapped: BTreeMap<_, Slot> = BTreeMap::new();
		let mut dropped = 0usize;
		let mut merged = 0usize;

		for (from, slot) in std::mem::take(&mut self.spans) {
			let new_from = changes.map_pos(from, Bias::Right);
			let new_to = changes.map_pos(slot.to, Bias::Left);
			if new_from >= new_to {
				tracing::trace!(
					target: "coauthor::authorship",
					from,
					to = slot.to,
					user = %slot.user_id,
					"authorship.map.drop"
				);
				dropped += 1;
				continue;
			}

			if let Some(mut prev) = mapped.last_entry()
				&& prev.get().to == new_from
				&& prev.get().user_id == slot.user_id
			{
				prev.get_mut().to = new_to;
				merged += 1;
				continue;
			}

			mapped.insert(
				new_from,
				Slot {
					to: new_to,
					user_id: slot.user_id,
				},
			);
		}

		tracing::debug!(
			target: "coauthor::authorship",
			len = changes.len(),
			len_after = changes.len_after(),
			spans = mapped.len(),
			dropped,
			merged,
			"authorship.map"
		);

		self.spans = mapped;
		self.doc_len = changes.len_after();
		debug_assert!(self.is_well_formed());
		Ok(())
	}

	/// Moves every span through a full change set.
	pub fn map_changes(&mut self, changes: &ChangeSet) -> Result<(), AuthorshipError> {
		self.map_through(&changes.desc())
	}
}
