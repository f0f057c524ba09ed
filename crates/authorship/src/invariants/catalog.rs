//! Invariant catalog for [`crate::store::AuthorshipStore`].
#![allow(dead_code)]

/// Spans must be non-empty, sorted by start, pairwise disjoint, and inside the
/// document.
///
/// - Enforced in: [`crate::store::AuthorshipStore::paint`], [`crate::store::AuthorshipStore::map_through`]
/// - Tested by: `invariants::proofs::prop_random_streams_match_model`, `invariants::proofs::test_overlapping_local_adjacency_is_normalized`
/// - Failure symptom: Two authors are drawn over the same text, or a marker points past the end of the document.
pub(crate) const SPANS_DISJOINT_AND_IN_BOUNDS: () = ();

/// Must not leave two spans of the same author touching each other.
///
/// - Enforced in: [`crate::store::AuthorshipStore::paint`] and the merge step of [`crate::store::AuthorshipStore::map_through`]
/// - Tested by: `invariants::proofs::prop_random_streams_match_model`, `invariants::proofs::test_deletion_rejoins_same_author`
/// - Failure symptom: Span count grows with every keystroke and markers render as a row of fragments.
pub(crate) const NO_SAME_AUTHOR_FRAGMENTATION: () = ();

/// Must attribute exactly `[from, to)` of a request to its author and leave every
/// other character's author unchanged.
///
/// - Enforced in: [`crate::reconcile::reconcile`] via [`crate::store::AuthorshipStore::commit`]
/// - Tested by: `invariants::proofs::prop_random_streams_match_model`
/// - Failure symptom: Text outside an edit changes author, or an edit stays partially attributed to someone else.
pub(crate) const UPDATE_PAINTS_ITS_RANGE: () = ();

/// Must move attribution with the text it describes when the document changes.
///
/// - Enforced in: [`crate::store::AuthorshipStore::map_through`]
/// - Tested by: `invariants::proofs::prop_random_streams_match_model`, `invariants::proofs::prop_changeset_and_desc_map_alike`
/// - Failure symptom: Highlights drift off the text after edits elsewhere in the document.
pub(crate) const MAPPING_FOLLOWS_TEXT: () = ();

/// Reconciling the same request twice must equal reconciling it once.
///
/// - Enforced in: [`crate::reconcile::reconcile`]
/// - Tested by: `invariants::proofs::prop_reconcile_is_idempotent`
/// - Failure symptom: Replayed or duplicated collaboration messages split or grow spans.
pub(crate) const IDEMPOTENT_REPLAY: () = ();

/// Requests in a batch must apply strictly in order, each against the result of
/// the previous one.
///
/// - Enforced in: [`crate::reconcile::reconcile_all`]
/// - Tested by: `invariants::proofs::prop_batch_equals_sequential`
/// - Failure symptom: Peers that receive the same batch render different authors.
pub(crate) const BATCH_APPLIES_IN_ORDER: () = ();

/// A rejected request or change must leave the store untouched.
///
/// - Enforced in: [`crate::reconcile::reconcile_all`], [`crate::store::AuthorshipStore::map_through`], [`crate::session::AuthorshipSession::apply_transaction`]
/// - Tested by: `invariants::proofs::test_rejected_inputs_leave_store_unchanged`
/// - Failure symptom: A malformed message from one peer corrupts attribution for everyone.
pub(crate) const UNCHANGED_ON_ERROR: () = ();
