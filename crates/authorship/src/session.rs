use std::collections::VecDeque;

use coauthor_primitives::{Change, ChangeDesc, ChangeError, CharIdx, Range, Rope, Transaction};

use crate::config::AuthorshipConfig;
use crate::error::AuthorshipError;
use crate::marker::{Marker, MarkerStyle};
use crate::reconcile::{ReconcileReport, reconcile_all};
use crate::span::UserId;
use crate::store::AuthorshipStore;
use crate::update::AuthorshipUpdate;

/// A document together with its authorship spans.
///
/// This is the host side of the pipeline: every transaction applies its text
/// change to the rope, moves the spans through the same change, and then
/// reconciles the authorship updates it carries. Nothing else mutates the
/// store, so the spans always describe the current text.
#[derive(Debug, Clone)]
pub struct AuthorshipSession {
	text: Rope,
	store: AuthorshipStore,
	deferred: VecDeque<AuthorshipUpdate>,
	style: MarkerStyle,
}

impl AuthorshipSession {
	/// Starts a session over `text` with no attributed spans.
	pub fn new(text: &str, config: &AuthorshipConfig) -> Self {
		let text = Rope::from(text);
		let store = AuthorshipStore::new(text.len_chars());
		Self {
			text,
			store,
			deferred: VecDeque::new(),
			style: config.marker_style(),
		}
	}

	/// Returns the current document text.
	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Returns the current authorship spans.
	pub fn store(&self) -> &AuthorshipStore {
		&self.store
	}

	/// Returns the document length in characters.
	pub fn len_chars(&self) -> usize {
		self.text.len_chars()
	}

	/// Returns the deferred update requests, in delivery order.
	pub fn deferred(&self) -> impl Iterator<Item = &AuthorshipUpdate> {
		self.deferred.iter()
	}

	/// Applies one transaction and its authorship updates.
	///
	/// Deferred updates are moved through the change and reconciled first,
	/// followed by `updates`, which must already be in the coordinates of
	/// the changed document. Everything is validated before anything is
	/// applied: on error the text, the spans, and the deferred queue are
	/// unchanged.
	pub fn apply_transaction(
		&mut self,
		tx: &Transaction,
		updates: &[AuthorshipUpdate],
	) -> Result<Vec<ReconcileReport>, AuthorshipError> {
		let desc = tx.desc();
		if desc.len() != self.text.len_chars() {
			return Err(ChangeError::LengthMismatch {
				expected: desc.len(),
				actual: self.text.len_chars(),
			}
			.into());
		}

		let batch = self.pending_batch(&desc, updates);
		for update in &batch {
			update.validate(desc.len_after())?;
		}

		tx.apply(&mut self.text)?;
		self.store.map_through(&desc)?;
		self.deferred.clear();

		tracing::debug!(
			target: "coauthor::authorship",
			len = self.text.len_chars(),
			updates = batch.len(),
			"authorship.session.transaction"
		);
		reconcile_all(&mut self.store, &batch)
	}

	/// Reconciles an update request against the current document right away.
	///
	/// This is the collaboration layer's entry point for attributing text
	/// that is already in the document.
	pub fn submit_authorship_update(
		&mut self,
		update: AuthorshipUpdate,
	) -> Result<ReconcileReport, AuthorshipError> {
		let tx = Transaction::identity(self.text.slice(..));
		let mut reports = self.apply_transaction(&tx, std::slice::from_ref(&update))?;
		Ok(reports.pop().unwrap_or_default())
	}

	/// Queues an update request to be reconciled with the next transaction.
	///
	/// Queued requests are moved through that transaction's change before
	/// they are reconciled.
	pub fn defer_authorship_update(
		&mut self,
		update: AuthorshipUpdate,
	) -> Result<(), AuthorshipError> {
		update.validate(self.text.len_chars())?;
		self.deferred.push_back(update);
		Ok(())
	}

	/// Reconciles all deferred requests against the current document.
	pub fn flush(&mut self) -> Result<Vec<ReconcileReport>, AuthorshipError> {
		let tx = Transaction::identity(self.text.slice(..));
		self.apply_transaction(&tx, &[])
	}

	/// Replaces `[from, to)` with `text` and attributes the inserted text to
	/// `user_id`, the way a keystroke or a pasted block arrives.
	///
	/// A pure deletion carries an empty update, which leaves the spans as the
	/// change mapped them.
	pub fn edit(
		&mut self,
		from: CharIdx,
		to: CharIdx,
		text: &str,
		user_id: impl Into<UserId>,
		local_update: bool,
	) -> Result<ReconcileReport, AuthorshipError> {
		let doc = self.text.slice(..);
		let tx = match (from == to, text.is_empty()) {
			(true, _) => Transaction::insert(doc, from, text)?,
			(false, true) => Transaction::delete(doc, from, to)?,
			(false, false) => Transaction::change(doc, [Change::replace(from, to, text)])?,
		};
		let inserted = text.chars().count();
		let update = AuthorshipUpdate::new(from, from + inserted, user_id, local_update);
		let mut reports = self.apply_transaction(&tx, std::slice::from_ref(&update))?;
		Ok(reports.pop().unwrap_or_default())
	}

	/// Projects all spans into markers.
	pub fn markers(&self) -> impl Iterator<Item = Marker> + '_ {
		self.store.markers(&self.style)
	}

	/// Projects the spans visible in `viewport` into markers.
	pub fn markers_in(&self, viewport: Range) -> impl Iterator<Item = Marker> + '_ {
		self.store.markers_in(viewport, &self.style)
	}

	fn pending_batch(&self, desc: &ChangeDesc, updates: &[AuthorshipUpdate]) -> Vec<AuthorshipUpdate> {
		self.deferred
			.iter()
			.map(|update| update.map_through(desc))
			.chain(updates.iter().cloned())
			.collect()
	}
}
