//! Graph search and highlight engine.
//!
//! Pure and synchronous: the match and connected sets are recomputed
//! wholesale on every keystroke or selection change, one pass over the
//! nodes plus one pass over the links.

use std::collections::HashSet;

use super::{ContactNode, GraphData, GraphLink};

/// An active search query.
///
/// Text and selection are mutually exclusive; the UI clears one when the
/// other is issued, and [`Query::from_parts`] gives text precedence if both
/// slip through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Query {
	/// No filtering; default rendering applies.
	#[default]
	None,
	/// Free-text term, matched case-insensitively against name, email,
	/// last name and company.
	Text(String),
	/// A single pinned node id.
	Selection(String),
}

impl Query {
	/// Builds the query from the two pieces of UI state.
	pub fn from_parts(term: &str, selected: Option<&str>) -> Self {
		if !term.is_empty() {
			Query::Text(term.to_string())
		} else if let Some(id) = selected {
			Query::Selection(id.to_string())
		} else {
			Query::None
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Query::None)
	}
}

/// Rendering precedence for a node while a query is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// Direct match: highest visual priority.
	Match,
	/// Shares a link with a match without matching itself.
	Connected,
	/// Unrelated to the query.
	Dimmed,
}

/// Output of [`compute_highlight`]: the direct-match set plus every node
/// one link away from a match. The two sets may overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSets {
	active: bool,
	pub matching: HashSet<String>,
	pub connected: HashSet<String>,
}

impl HighlightSets {
	/// Whether a query is in effect. With no active query both sets are
	/// empty and callers fall back to unfiltered rendering.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Three-tier precedence for node coloring.
	pub fn node_emphasis(&self, id: &str) -> Emphasis {
		if self.matching.contains(id) {
			Emphasis::Match
		} else if self.connected.contains(id) {
			Emphasis::Connected
		} else {
			Emphasis::Dimmed
		}
	}

	/// Link emphasis follows the match set only: a link is emphasized iff
	/// either endpoint is a direct match.
	pub fn link_emphasized(&self, link: &GraphLink) -> bool {
		self.matching.contains(link.source.as_str())
			|| self.matching.contains(link.target.as_str())
	}
}

/// Case-insensitive substring match over the searchable fields. The term
/// must already be lowercased.
fn node_matches(node: &ContactNode, term: &str) -> bool {
	node.email.to_lowercase().contains(term)
		|| node.name.to_lowercase().contains(term)
		|| node.last_name.to_lowercase().contains(term)
		|| node.company.to_lowercase().contains(term)
}

/// Computes the match and connected sets for a query.
///
/// The graph is read-only here. A link endpoint whose id is absent from
/// the node set is tolerated: it can enter the connected set, where it
/// resolves to no drawn node and stays inert.
pub fn compute_highlight(graph: &GraphData, query: &Query) -> HighlightSets {
	let mut sets = HighlightSets::default();

	match query {
		Query::None => return sets,
		Query::Text(term) => {
			let term = term.to_lowercase();
			for node in &graph.nodes {
				if node_matches(node, &term) {
					sets.matching.insert(node.id.clone());
				}
			}
		}
		Query::Selection(id) => {
			sets.matching.insert(id.clone());
		}
	}
	sets.active = true;

	if !sets.matching.is_empty() {
		for link in &graph.links {
			let (source, target) = (link.source.as_str(), link.target.as_str());
			if sets.matching.contains(source) {
				sets.connected.insert(target.to_string());
			}
			if sets.matching.contains(target) {
				sets.connected.insert(source.to_string());
			}
		}
	}

	sets
}

#[cfg(test)]
mod tests {
	use super::super::LinkEnd;
	use super::*;

	fn contact(id: &str, name: &str, email: &str, company: &str) -> ContactNode {
		let last_name = name.rsplit(' ').next().unwrap_or_default().to_string();
		ContactNode {
			id: id.into(),
			name: name.into(),
			email: email.into(),
			company: company.into(),
			last_name,
			..Default::default()
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: LinkEnd::new(source),
			target: LinkEnd::new(target),
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				contact("a", "Ada Lovelace", "ada@engines.com", "Analytical Engines"),
				contact("b", "Charles Babbage", "babbage@engines.com", "Analytical Engines"),
				contact("c", "Grace Hopper", "grace@navy.mil", "US Navy"),
				contact("d", "Alan Turing", "alan@bletchley.uk", "GCHQ"),
			],
			links: vec![link("a", "b"), link("c", "a"), link("d", "d")],
			..Default::default()
		}
	}

	#[test]
	fn empty_query_yields_empty_sets() {
		let sets = compute_highlight(&sample(), &Query::None);
		assert!(!sets.is_active());
		assert!(sets.matching.is_empty());
		assert!(sets.connected.is_empty());
	}

	#[test]
	fn exact_email_matches_only_that_node() {
		let sets = compute_highlight(&sample(), &Query::Text("grace@navy.mil".into()));
		assert!(sets.matching.contains("c"));
		assert!(!sets.matching.contains("d"));
		assert_eq!(sets.matching.len(), 1);
	}

	#[test]
	fn text_match_is_case_insensitive_across_fields() {
		let graph = sample();
		// name
		assert!(compute_highlight(&graph, &Query::Text("ADA".into()))
			.matching
			.contains("a"));
		// company
		let by_company = compute_highlight(&graph, &Query::Text("navy".into()));
		assert!(by_company.matching.contains("c"));
		// last name
		assert!(compute_highlight(&graph, &Query::Text("turing".into()))
			.matching
			.contains("d"));
	}

	#[test]
	fn connected_set_is_symmetric_over_link_direction() {
		let graph = sample();
		// "a" matches; it is the target of link(c, a) and the source of
		// link(a, b), so both neighbors land in the connected set.
		let sets = compute_highlight(&graph, &Query::Text("lovelace".into()));
		assert_eq!(sets.matching, HashSet::from(["a".to_string()]));
		assert!(sets.connected.contains("b"));
		assert!(sets.connected.contains("c"));
		assert!(!sets.connected.contains("d"));
	}

	#[test]
	fn selection_is_the_sole_match() {
		let sets = compute_highlight(&sample(), &Query::Selection("b".into()));
		assert_eq!(sets.matching, HashSet::from(["b".to_string()]));
		assert_eq!(sets.connected, HashSet::from(["a".to_string()]));
	}

	#[test]
	fn selecting_unknown_id_matches_nothing_else() {
		let sets = compute_highlight(&sample(), &Query::Selection("ghost".into()));
		assert_eq!(sets.matching, HashSet::from(["ghost".to_string()]));
		assert!(sets.connected.is_empty());
	}

	#[test]
	fn self_loops_are_tolerated() {
		let sets = compute_highlight(&sample(), &Query::Selection("d".into()));
		// link(d, d) connects the match to itself; set insertion is idempotent
		assert_eq!(sets.connected, HashSet::from(["d".to_string()]));
	}

	#[test]
	fn embedded_endpoint_behaves_like_bare_id() {
		let bare = sample();
		let mut embedded = sample();
		embedded.links = serde_json::from_str(
			r#"[
				{"source": "a", "target": {"id": "b"}},
				{"source": {"id": "c"}, "target": "a"},
				{"source": "d", "target": "d"}
			]"#,
		)
		.unwrap();

		let query = Query::Text("lovelace".into());
		assert_eq!(
			compute_highlight(&bare, &query),
			compute_highlight(&embedded, &query)
		);
		let sets = compute_highlight(&embedded, &query);
		assert!(sets.link_emphasized(&embedded.links[0]));
		assert!(sets.link_emphasized(&embedded.links[1]));
		assert!(!sets.link_emphasized(&embedded.links[2]));
	}

	#[test]
	fn emphasis_precedence_is_match_then_connected_then_dimmed() {
		let sets = compute_highlight(&sample(), &Query::Text("engines.com".into()));
		// a and b both match and share a link: match wins over connected
		assert_eq!(sets.node_emphasis("a"), Emphasis::Match);
		assert_eq!(sets.node_emphasis("b"), Emphasis::Match);
		assert_eq!(sets.node_emphasis("c"), Emphasis::Connected);
		assert_eq!(sets.node_emphasis("d"), Emphasis::Dimmed);
	}

	#[test]
	fn query_from_parts_prefers_text_and_maps_empties() {
		assert_eq!(Query::from_parts("", None), Query::None);
		assert_eq!(Query::from_parts("ada", None), Query::Text("ada".into()));
		assert_eq!(
			Query::from_parts("", Some("a")),
			Query::Selection("a".into())
		);
		assert_eq!(
			Query::from_parts("ada", Some("a")),
			Query::Text("ada".into())
		);
		assert!(Query::from_parts("", None).is_none());
	}
}
