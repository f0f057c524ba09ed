use coauthor_primitives::CharIdx;
use smallvec::SmallVec;

use crate::error::AuthorshipError;
use crate::span::AuthorSpan;
use crate::store::AuthorshipStore;
use crate::update::AuthorshipUpdate;

/// How one existing span is treated by an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAction {
	/// Same author touching the request: replaced by one span covering both.
	Extend,
	/// Same author, not touching: kept as is.
	Keep,
	/// Another author's span next to the request: kept, the request is added
	/// beside it.
	Adjacent,
	/// Another author's span under the request: cut around it.
	Split,
}

/// Summary of what one request did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	/// Spans inspected (overlapping or touching the request).
	pub candidates: usize,
	/// Same-author spans extended to cover the request.
	pub extended: usize,
	/// Same-author spans kept unchanged.
	pub kept: usize,
	/// Other authors' spans left intact next to the request.
	pub adjacent: usize,
	/// Other authors' spans split around the request.
	pub split: usize,
	/// True if the request touched nothing that already covered it and a new
	/// span was added for it.
	pub fresh: bool,
}

/// Decides how `span` is treated by `update`.
///
/// For another author's span, touching at the request's end is always
/// adjacency. Touching at the request's start is detected differently for
/// local and remote requests: by the time a local edit is reconciled the
/// span's end has already moved by the edit's own length, so it is compared
/// after subtracting that length.
///
/// [`AuthorshipStore::map_through`] keeps span ends before text inserted at
/// them, so a local insert at another author's span end arrives here as a
/// split with an empty trailing piece. The commit still leaves that span
/// whole.
pub fn classify(span: &AuthorSpan, update: &AuthorshipUpdate) -> SpanAction {
	if span.user_id == update.user_id {
		if span.from == update.to || span.to == update.from {
			SpanAction::Extend
		} else {
			SpanAction::Keep
		}
	} else if span.from == update.to
		|| (!update.local_update && span.to == update.from)
		|| (update.local_update && span.to.checked_sub(update.len()) == Some(update.from))
	{
		SpanAction::Adjacent
	} else {
		SpanAction::Split
	}
}

/// Applies one update request to the store.
///
/// Only spans overlapping or touching `[update.from, update.to]` are looked at.
/// Their removals and replacements, plus a fresh span for the request when
/// nothing produced one, are committed together; where the request overlaps
/// another author's span, the request's author wins.
///
/// # Errors
///
/// [`AuthorshipError::InvalidRange`] or [`AuthorshipError::EmptyUserId`] if
/// the request does not fit the store's document. The store is unchanged.
pub fn reconcile(
	store: &mut AuthorshipStore,
	update: &AuthorshipUpdate,
) -> Result<ReconcileReport, AuthorshipError> {
	update.validate(store.doc_len())?;
	Ok(apply(store, update))
}

/// Applies update requests strictly in order, each seeing the result of the
/// previous one.
///
/// All requests are validated first, so either every request is applied or
/// none is.
pub fn reconcile_all(
	store: &mut AuthorshipStore,
	updates: &[AuthorshipUpdate],
) -> Result<Vec<ReconcileReport>, AuthorshipError> {
	for update in updates {
		update.validate(store.doc_len())?;
	}
	Ok(updates.iter().map(|update| apply(store, update)).collect())
}

fn apply(store: &mut AuthorshipStore, update: &AuthorshipUpdate) -> ReconcileReport {
	let mut report = ReconcileReport::default();
	if update.is_empty() {
		tracing::trace!(
			target: "coauthor::authorship",
			at = update.from,
			user = %update.user_id,
			"authorship.reconcile.empty"
		);
		return report;
	}

	let AuthorshipUpdate {
		from,
		to,
		ref user_id,
		local_update,
	} = *update;
	let effect = || AuthorSpan::new(from, to, user_id.clone());

	let mut removed: SmallVec<[CharIdx; 4]> = SmallVec::new();
	let mut others: SmallVec<[AuthorSpan; 4]> = SmallVec::new();
	let mut own: SmallVec<[AuthorSpan; 2]> = SmallVec::new();
	let mut covered = false;

	for span in store.touching(from, to) {
		report.candidates += 1;
		let action = classify(&span, update);
		tracing::trace!(
			target: "coauthor::authorship",
			span = %span,
			?action,
			"authorship.reconcile.candidate"
		);

		match action {
			SpanAction::Extend => {
				report.extended += 1;
				removed.push(span.from);
				own.push(AuthorSpan::new(
					span.from.min(from),
					span.to.max(to),
					user_id.clone(),
				));
			}
			SpanAction::Keep => {
				report.kept += 1;
				covered |= span.covers(from, to);
			}
			SpanAction::Adjacent => {
				report.adjacent += 1;
				own.push(effect());
			}
			SpanAction::Split => {
				report.split += 1;
				removed.push(span.from);
				let before = AuthorSpan::new(span.from, from, span.user_id.clone());
				let after = AuthorSpan::new(to, span.to, span.user_id);
				others.extend([before, after].into_iter().filter(|s| !s.is_empty()));
				own.push(effect());
			}
		}
	}

	covered |= own.iter().any(|span| span.covers(from, to));
	if !covered {
		report.fresh = true;
		own.push(effect());
	}

	tracing::debug!(
		target: "coauthor::authorship",
		from,
		to,
		user = %user_id,
		len = update.len(),
		local = local_update,
		candidates = report.candidates,
		removed = removed.len(),
		added = others.len() + own.len(),
		"authorship.reconcile"
	);

	store.commit(&removed, others.into_iter().chain(own));
	debug_assert!(store.is_well_formed());
	report
}
