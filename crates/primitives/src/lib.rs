//! Core types for text editing: character ranges, change sets, and position mapping.

/// Text range types measured in characters.
pub mod range;
/// Change sets, change descriptions, and transactions.
pub mod transaction;

pub use range::{CharIdx, CharLen, Range};
pub use ropey::{Rope, RopeSlice};
pub use transaction::{Bias, Change, ChangeDesc, ChangeError, ChangeSet, Replacement, Transaction};
