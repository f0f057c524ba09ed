//! Edit scripts and their replay.
//!
//! ```json
//! {
//!   "text": "hello",
//!   "steps": [
//!     {
//!       "changes": [{ "from": 5, "to": 5, "insert": " world" }],
//!       "updates": [{ "from": 5, "to": 11, "userId": "bob", "localUpdate": false }]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use coauthor_authorship::{AuthorSpan, AuthorshipConfig, AuthorshipSession, AuthorshipUpdate, Marker};
use coauthor_primitives::{Change, CharIdx, Transaction};
use serde::{Deserialize, Serialize};

/// A starting document and the steps applied to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Script {
	/// Initial document text.
	pub text: String,
	/// Transactions applied in order.
	pub steps: Vec<Step>,
}

/// One host transaction: a document change plus the authorship updates it
/// carries, in the coordinates of the changed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
	/// Sorted, non-overlapping replacements against the current text.
	pub changes: Vec<ChangeSpec>,
	/// Authorship updates reconciled after the change.
	pub updates: Vec<AuthorshipUpdate>,
}

/// Replaces `[from, to)` of the current text with `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeSpec {
	pub from: CharIdx,
	pub to: CharIdx,
	#[serde(default)]
	pub insert: String,
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
	pub text: String,
	pub spans: Vec<AuthorSpan>,
	pub markers: Vec<Marker>,
}

impl Script {
	/// Parses a script from JSON source.
	pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
		serde_json::from_str(src).context("parsing edit script")
	}

	/// Reads and parses a script file.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let src = std::fs::read_to_string(path)
			.with_context(|| format!("reading edit script {}", path.display()))?;
		Self::from_json_str(&src).with_context(|| format!("in {}", path.display()))
	}
}

/// Replays every step of `script` through a fresh session.
///
/// Fails on the first step whose change or updates are rejected; the error
/// names that step.
pub fn run_script(script: &Script, config: &AuthorshipConfig) -> anyhow::Result<Report> {
	let mut session = AuthorshipSession::new(&script.text, config);

	for (index, step) in script.steps.iter().enumerate() {
		let changes = step
			.changes
			.iter()
			.map(|c| Change::replace(c.from, c.to, c.insert.as_str()));
		let tx = Transaction::change(session.text().slice(..), changes)
			.with_context(|| format!("step {index}: invalid change"))?;
		let reports = session
			.apply_transaction(&tx, &step.updates)
			.with_context(|| format!("step {index}: rejected"))?;

		tracing::debug!(
			target: "coauthor::replay",
			step = index,
			len = session.len_chars(),
			updates = reports.len(),
			spans = session.store().len(),
			"replay.step"
		);
	}

	Ok(Report {
		text: session.text().to_string(),
		spans: session.store().to_vec(),
		markers: session.markers().collect(),
	})
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	const TYPING: &str = r#"{
		"text": "",
		"steps": [
			{
				"changes": [{ "from": 0, "to": 0, "insert": "hello world" }],
				"updates": [{ "from": 0, "to": 11, "userId": "alice", "localUpdate": true }]
			},
			{
				"changes": [{ "from": 5, "to": 5, "insert": "," }],
				"updates": [{ "from": 5, "to": 6, "userId": "bob" }]
			},
			{
				"changes": [{ "from": 0, "to": 1 }]
			}
		]
	}"#;

	#[test]
	fn test_replay_typing_script() {
		let script = Script::from_json_str(TYPING).unwrap();
		let report = run_script(&script, &AuthorshipConfig::default()).unwrap();
		assert_eq!(report.text, "ello, world");
		assert_eq!(
			report.spans,
			vec![
				AuthorSpan::new(0, 4, "alice"),
				AuthorSpan::new(4, 5, "bob"),
				AuthorSpan::new(5, 11, "alice"),
			]
		);
		assert_eq!(report.markers.len(), 3);
		assert_eq!(report.markers[1].class, "authorship-highlight");
	}

	#[test]
	fn test_report_serializes_wire_names() {
		let script = Script::from_json_str(TYPING).unwrap();
		let report = run_script(&script, &AuthorshipConfig::default()).unwrap();
		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(json["spans"][1]["userId"], "bob");
		assert_eq!(json["markers"][1]["attributes"]["data-user-id"], "bob");
	}

	#[test]
	fn test_error_names_failing_step() {
		let script = Script::from_json_str(
			r#"{
				"text": "abc",
				"steps": [
					{ "changes": [{ "from": 3, "to": 3, "insert": "d" }] },
					{ "updates": [{ "from": 0, "to": 9, "userId": "alice" }] }
				]
			}"#,
		)
		.unwrap();
		let err = run_script(&script, &AuthorshipConfig::default()).unwrap_err();
		assert_eq!(err.to_string(), "step 1: rejected");
	}

	#[test]
	fn test_invalid_change_is_reported() {
		let script = Script::from_json_str(
			r#"{ "text": "abc", "steps": [{ "changes": [{ "from": 2, "to": 1 }] }] }"#,
		)
		.unwrap();
		let err = run_script(&script, &AuthorshipConfig::default()).unwrap_err();
		assert_eq!(err.to_string(), "step 0: invalid change");
	}

	#[test]
	fn test_unknown_field_is_rejected() {
		assert!(Script::from_json_str(r#"{ "txt": "" }"#).is_err());
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{TYPING}").unwrap();
		let script = Script::load(file.path()).unwrap();
		assert_eq!(script.steps.len(), 3);
	}

	#[test]
	fn test_load_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = Script::load(&dir.path().join("missing.json")).unwrap_err();
		assert!(err.to_string().starts_with("reading edit script"));
	}
}
