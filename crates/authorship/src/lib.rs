//! Authorship range tracking for collaboratively edited documents.
//!
//! An [`AuthorshipStore`] records which user most recently authored each span
//! of a document as a set of disjoint, user-labeled character ranges. Every
//! host transaction first moves the stored spans through the document change
//! ([`AuthorshipStore::map_through`]), then reconciles the transaction's
//! [`AuthorshipUpdate`]s one by one ([`reconcile()`]). [`AuthorshipSession`] wires
//! both steps to a [`Rope`](coauthor_primitives::Rope) for hosts that want the
//! whole pipeline.

/// Authorship configuration loaded from TOML.
pub mod config;
/// Error types for requests, change mapping, and configuration.
pub mod error;
/// Moving spans through document changes.
mod mapper;
/// Rendering projection of the store.
pub mod marker;
/// Incremental reconciliation of authorship updates.
pub mod reconcile;
/// Document plus authorship pipeline.
pub mod session;
/// Span and user identifier types.
pub mod span;
/// The ordered, non-overlapping span set.
pub mod store;
/// Authorship update requests.
pub mod update;

mod invariants;

pub use config::AuthorshipConfig;
pub use error::{AuthorshipError, ConfigError};
pub use marker::{Marker, MarkerStyle};
pub use reconcile::{ReconcileReport, reconcile, reconcile_all};
pub use session::AuthorshipSession;
pub use span::{AuthorSpan, UserId};
pub use store::AuthorshipStore;
pub use update::AuthorshipUpdate;
