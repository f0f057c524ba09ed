//! Proofs for authorship store invariants.
//!
//! The random tests compare the store against a per-character model: one
//! `Option<UserId>` per document character. An update paints its range, and a
//! change carries authors along with the characters it keeps.

use coauthor_primitives::{ChangeDesc, ChangeSet, Replacement, Rope, Transaction};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::error::AuthorshipError;
use crate::reconcile::{reconcile, reconcile_all};
use crate::span::{AuthorSpan, UserId};
use crate::store::AuthorshipStore;
use crate::update::AuthorshipUpdate;

type Model = Vec<Option<UserId>>;

const USERS: [&str; 3] = ["ann", "bo", "cy"];

fn model_of(store: &AuthorshipStore) -> Model {
	let mut model = vec![None; store.doc_len()];
	for span in store.iter() {
		for slot in &mut model[span.from..span.to] {
			*slot = Some(span.user_id.clone());
		}
	}
	model
}

fn paint_model(model: &mut Model, update: &AuthorshipUpdate) {
	for slot in &mut model[update.from..update.to] {
		*slot = Some(update.user_id.clone());
	}
}

/// Text inserted strictly inside a span joins it, text inserted at a span
/// boundary joins nothing, and a replacement takes the author of the last
/// character it removes.
fn map_model(model: &Model, desc: &ChangeDesc) -> Model {
	let mut out = Model::with_capacity(desc.len_after());
	let mut pos = 0;
	for Replacement {
		from,
		to,
		inserted_len,
	} in desc.replacements()
	{
		out.extend_from_slice(&model[pos..from]);
		let inherited = if from == to {
			match (from.checked_sub(1).map(|i| &model[i]), model.get(from)) {
				(Some(Some(before)), Some(Some(after))) if before == after => Some(after.clone()),
				_ => None,
			}
		} else {
			model[to - 1].clone()
		};
		out.extend(std::iter::repeat_n(inherited, inserted_len));
		pos = to;
	}
	out.extend_from_slice(&model[pos..]);
	out
}

#[derive(Debug, Clone)]
enum Step {
	Update {
		from: usize,
		len: usize,
		user: usize,
		local: bool,
	},
	Edit(Vec<(usize, usize, usize)>),
}

fn step() -> impl Strategy<Value = Step> {
	prop_oneof![
		3 => (0usize..64, 0usize..12, 0usize..USERS.len(), any::<bool>())
			.prop_map(|(from, len, user, local)| Step::Update { from, len, user, local }),
		2 => prop::collection::vec((0usize..8, 0usize..6, 0usize..5), 1..4).prop_map(Step::Edit),
	]
}

/// Resolves a random update against the current document length.
fn resolve_update(doc_len: usize, from: usize, len: usize, user: usize, local: bool) -> AuthorshipUpdate {
	let from = from % (doc_len + 1);
	let to = (from + len).min(doc_len);
	AuthorshipUpdate::new(from, to, USERS[user], local)
}

/// Resolves random `(gap, deleted, inserted)` seeds into sorted replacements.
fn resolve_edit(doc_len: usize, seeds: &[(usize, usize, usize)]) -> Vec<Replacement> {
	let mut cursor = 0;
	let mut out = Vec::with_capacity(seeds.len());
	for &(gap, deleted, inserted) in seeds {
		let from = (cursor + gap).min(doc_len);
		let to = (from + deleted).min(doc_len);
		out.push(Replacement::new(from, to, inserted));
		cursor = to;
	}
	out
}

fn seeded_store(doc_len: usize, spans: &[(usize, usize, usize)]) -> AuthorshipStore {
	let mut store = AuthorshipStore::new(doc_len);
	for &(from, len, user) in spans {
		let update = resolve_update(doc_len, from, len, user, false);
		reconcile(&mut store, &update).unwrap();
	}
	store
}

proptest! {
	#[test]
	fn prop_random_streams_match_model(
		initial_len in 0usize..40,
		steps in prop::collection::vec(step(), 1..40),
	) {
		let mut store = AuthorshipStore::new(initial_len);
		let mut model: Model = vec![None; initial_len];

		for step in steps {
			match step {
				Step::Update { from, len, user, local } => {
					let update = resolve_update(store.doc_len(), from, len, user, local);
					reconcile(&mut store, &update).unwrap();
					paint_model(&mut model, &update);
				}
				Step::Edit(seeds) => {
					let replacements = resolve_edit(store.doc_len(), &seeds);
					let desc = ChangeDesc::from_replacements(store.doc_len(), replacements).unwrap();
					store.map_through(&desc).unwrap();
					model = map_model(&model, &desc);
				}
			}
			prop_assert!(store.is_well_formed(), "malformed store: {:?}", store.to_vec());
			prop_assert_eq!(model_of(&store), model.clone());
		}
	}

	#[test]
	fn prop_reconcile_is_idempotent(
		doc_len in 1usize..40,
		spans in prop::collection::vec((0usize..40, 0usize..10, 0usize..USERS.len()), 0..8),
		update in (0usize..40, 0usize..10, 0usize..USERS.len(), any::<bool>()),
	) {
		let mut store = seeded_store(doc_len, &spans);
		let (from, len, user, local) = update;
		let update = resolve_update(doc_len, from, len, user, local);

		reconcile(&mut store, &update).unwrap();
		let once = store.clone();
		reconcile(&mut store, &update).unwrap();
		prop_assert_eq!(store, once);
	}

	#[test]
	fn prop_batch_equals_sequential(
		doc_len in 1usize..40,
		updates in prop::collection::vec((0usize..40, 0usize..10, 0usize..USERS.len(), any::<bool>()), 0..10),
	) {
		let updates: Vec<_> = updates
			.into_iter()
			.map(|(from, len, user, local)| resolve_update(doc_len, from, len, user, local))
			.collect();

		let mut batched = AuthorshipStore::new(doc_len);
		reconcile_all(&mut batched, &updates).unwrap();

		let mut sequential = AuthorshipStore::new(doc_len);
		for update in &updates {
			reconcile(&mut sequential, update).unwrap();
		}
		prop_assert_eq!(batched, sequential);
	}

	#[test]
	fn prop_changeset_and_desc_map_alike(
		text in "[a-z]{0,30}",
		spans in prop::collection::vec((0usize..30, 0usize..8, 0usize..USERS.len()), 0..6),
		edit in prop::collection::vec((0usize..8, 0usize..6, "[A-Z]{0,4}"), 1..4),
	) {
		let doc = Rope::from(text.as_str());
		let doc_len = doc.len_chars();
		let store = seeded_store(doc_len, &spans);

		let mut cursor = 0;
		let mut changes = Vec::new();
		for (gap, deleted, insert) in edit {
			let from = (cursor + gap).min(doc_len);
			let to = (from + deleted).min(doc_len);
			changes.push(coauthor_primitives::Change::replace(from, to, insert));
			cursor = to;
		}
		let tx = Transaction::change(doc.slice(..), changes).unwrap();
		let set: &ChangeSet = tx.changes();
		let desc = ChangeDesc::from_replacements(doc_len, set.desc().replacements()).unwrap();

		let mut by_set = store.clone();
		by_set.map_changes(set).unwrap();
		let mut by_desc = store;
		by_desc.map_through(&desc).unwrap();
		prop_assert_eq!(by_set, by_desc);
	}
}

#[cfg_attr(test, test)]
pub fn test_overlapping_local_adjacency_is_normalized() {
	// The span end sits exactly one edit length past the request start, which
	// reads as adjacency for a local request even though the two overlap.
	let mut store = AuthorshipStore::with_spans(20, [AuthorSpan::new(0, 9, "ann")]).unwrap();
	reconcile(&mut store, &AuthorshipUpdate::local(5, 9, "bo")).unwrap();
	assert!(store.is_well_formed());
	assert_eq!(
		store.to_vec(),
		vec![AuthorSpan::new(0, 5, "ann"), AuthorSpan::new(5, 9, "bo")]
	);
}

#[cfg_attr(test, test)]
pub fn test_deletion_rejoins_same_author() {
	let mut store = AuthorshipStore::with_spans(
		12,
		[
			AuthorSpan::new(0, 4, "ann"),
			AuthorSpan::new(4, 8, "bo"),
			AuthorSpan::new(8, 12, "ann"),
		],
	)
	.unwrap();
	let desc = ChangeDesc::from_replacements(12, [Replacement::deletion(4, 8)]).unwrap();
	store.map_through(&desc).unwrap();
	assert_eq!(store.to_vec(), vec![AuthorSpan::new(0, 8, "ann")]);
	assert_eq!(store.len(), 1);
}

#[cfg_attr(test, test)]
pub fn test_rejected_inputs_leave_store_unchanged() {
	let mut store = AuthorshipStore::with_spans(
		10,
		[AuthorSpan::new(0, 4, "ann"), AuthorSpan::new(6, 10, "bo")],
	)
	.unwrap();
	let before = store.clone();

	let rejected = reconcile_all(
		&mut store,
		&[
			AuthorshipUpdate::remote(0, 10, "cy"),
			AuthorshipUpdate::remote(2, 3, ""),
		],
	);
	assert_eq!(
		rejected,
		Err(AuthorshipError::EmptyUserId { from: 2, to: 3 })
	);
	assert_eq!(store, before);

	let wrong_len = ChangeDesc::from_replacements(11, [Replacement::insertion(0, 1)]).unwrap();
	assert!(store.map_through(&wrong_len).is_err());
	assert_eq!(store, before);
}
