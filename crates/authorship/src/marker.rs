use std::collections::BTreeMap;

use coauthor_primitives::{CharIdx, Range};
use serde::Serialize;

use crate::span::AuthorSpan;
use crate::store::AuthorshipStore;

/// Default CSS class for authorship highlights.
pub const DEFAULT_MARKER_CLASS: &str = "authorship-highlight";
/// Default attribute carrying the author's user id.
pub const DEFAULT_USER_ATTRIBUTE: &str = "data-user-id";

/// A renderable highlight for one authorship span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
	/// Start of the highlighted text.
	pub from: CharIdx,
	/// End of the highlighted text (exclusive).
	pub to: CharIdx,
	/// Class applied to the highlighted text.
	pub class: String,
	/// Attributes applied to the highlighted text, including the author.
	pub attributes: BTreeMap<String, String>,
}

/// How spans are projected into [`Marker`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
	/// Class applied to every marker.
	pub class: String,
	/// Attribute name holding the author's user id.
	pub user_attribute: String,
}

impl Default for MarkerStyle {
	fn default() -> Self {
		Self {
			class: DEFAULT_MARKER_CLASS.to_string(),
			user_attribute: DEFAULT_USER_ATTRIBUTE.to_string(),
		}
	}
}

impl MarkerStyle {
	/// Builds the marker for one span.
	pub fn marker(&self, span: &AuthorSpan) -> Marker {
		Marker {
			from: span.from,
			to: span.to,
			class: self.class.clone(),
			attributes: BTreeMap::from([(
				self.user_attribute.clone(),
				span.user_id.to_string(),
			)]),
		}
	}
}

impl AuthorshipStore {
	/// Projects every span into a marker, in document order.
	pub fn markers<'a>(&'a self, style: &'a MarkerStyle) -> impl Iterator<Item = Marker> + 'a {
		self.iter().map(move |span| style.marker(&span))
	}

	/// Projects the spans visible in `viewport` into markers.
	///
	/// Markers are not clipped to the viewport.
	pub fn markers_in<'a>(
		&'a self,
		viewport: Range,
		style: &'a MarkerStyle,
	) -> impl Iterator<Item = Marker> + 'a {
		self.overlapping(viewport).map(move |span| style.marker(&span))
	}
}
