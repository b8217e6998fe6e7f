//! Autocomplete suggestions for the search box.
//!
//! Builds on the same field matching as the highlight engine, adding a
//! per-field score so each contact surfaces its best match, and an
//! exact-first, prefix-second global ordering.

use super::ContactNode;

/// Maximum number of entries surfaced in the dropdown.
pub const MAX_SUGGESTIONS: usize = 5;

/// Which searchable field produced a suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchField {
	Name,
	Email,
	Company,
	LastName,
}

/// How strongly a field value matched the term, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum MatchScore {
	Anywhere,
	WordBoundary,
	Prefix,
	Exact,
}

/// One dropdown entry: the contact plus the field (and its display value)
/// that matched best.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion<'a> {
	pub node: &'a ContactNode,
	pub field: MatchField,
	pub value: &'a str,
	score: MatchScore,
}

/// Scores a lowercased field value against a lowercased term.
fn match_score(value: &str, term: &str) -> Option<MatchScore> {
	if value == term {
		Some(MatchScore::Exact)
	} else if value.starts_with(term) {
		Some(MatchScore::Prefix)
	} else if value.contains(&format!(" {term}")) {
		Some(MatchScore::WordBoundary)
	} else if value.contains(term) {
		Some(MatchScore::Anywhere)
	} else {
		None
	}
}

/// Collects at most one suggestion per contact (its best-scoring field),
/// ordered exact-equality first, then prefix matches, then the rest in
/// encounter order, truncated to [`MAX_SUGGESTIONS`].
pub fn suggestions<'a>(nodes: &'a [ContactNode], term: &str) -> Vec<Suggestion<'a>> {
	let term = term.to_lowercase();
	if term.is_empty() {
		return Vec::new();
	}

	let mut out = Vec::new();
	for node in nodes {
		let fields = [
			(MatchField::Name, node.name.as_str()),
			(MatchField::Email, node.email.as_str()),
			(MatchField::Company, node.company.as_str()),
			(MatchField::LastName, node.last_name.as_str()),
		];

		let mut best: Option<Suggestion<'a>> = None;
		for (field, value) in fields {
			if let Some(score) = match_score(&value.to_lowercase(), &term) {
				if best.as_ref().map_or(true, |b| score > b.score) {
					best = Some(Suggestion {
						node,
						field,
						value,
						score,
					});
				}
			}
		}
		out.extend(best);
	}

	// Stable sort: ties below the exact/prefix partition keep input
	// iteration order.
	out.sort_by_key(|s| match s.score {
		MatchScore::Exact => 0,
		MatchScore::Prefix => 1,
		_ => 2,
	});
	out.truncate(MAX_SUGGESTIONS);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn named(id: &str, name: &str) -> ContactNode {
		ContactNode {
			id: id.into(),
			name: name.into(),
			..Default::default()
		}
	}

	#[test]
	fn prefix_matches_rank_before_substring_matches() {
		let bjo = ContactNode {
			id: "3".into(),
			email: "bjo@x.com".into(),
			..Default::default()
		};
		let nodes = vec![bjo, named("1", "John Doe"), named("2", "Joanna K")];

		let got = suggestions(&nodes, "jo");
		let values: Vec<&str> = got.iter().map(|s| s.value).collect();
		assert_eq!(values, vec!["John Doe", "Joanna K", "bjo@x.com"]);
	}

	#[test]
	fn exact_match_ranks_first() {
		let nodes = vec![named("1", "Joanna"), named("2", "Jo")];
		let got = suggestions(&nodes, "jo");
		assert_eq!(got[0].value, "Jo");
		assert_eq!(got[1].value, "Joanna");
	}

	#[test]
	fn each_node_contributes_its_best_field_once() {
		let node = ContactNode {
			id: "1".into(),
			name: "Grace Hopper".into(),
			email: "grace@navy.mil".into(),
			company: "US Navy".into(),
			last_name: "Hopper".into(),
			..Default::default()
		};
		// "grace" is a prefix of both name and email; the name comes first
		// among equally-scored fields.
		let nodes = [node];
		let got = suggestions(&nodes, "grace");
		assert_eq!(got.len(), 1);
		assert_eq!(got[0].field, MatchField::Name);
		assert_eq!(got[0].value, "Grace Hopper");
	}

	#[test]
	fn word_boundary_beats_plain_substring_within_a_node() {
		let node = ContactNode {
			id: "1".into(),
			name: "Anne Hopper".into(),
			email: "shopper@x.com".into(),
			..Default::default()
		};
		let nodes = [node];
		let got = suggestions(&nodes, "hopper");
		// " hopper" in the name is a word-boundary match; "shopper" is only
		// a substring.
		assert_eq!(got[0].field, MatchField::Name);
	}

	#[test]
	fn result_is_capped_at_five() {
		let nodes: Vec<ContactNode> = (0..8)
			.map(|i| named(&i.to_string(), &format!("Jo {i}")))
			.collect();
		assert_eq!(suggestions(&nodes, "jo").len(), MAX_SUGGESTIONS);
	}

	#[test]
	fn empty_term_yields_nothing() {
		assert!(suggestions(&[named("1", "John")], "").is_empty());
	}

	#[test]
	fn substring_ties_preserve_encounter_order() {
		let nodes = vec![
			ContactNode {
				id: "1".into(),
				email: "bjo@x.com".into(),
				..Default::default()
			},
			ContactNode {
				id: "2".into(),
				email: "ajo@x.com".into(),
				..Default::default()
			},
		];
		let got = suggestions(&nodes, "jo");
		assert_eq!(got[0].node.id, "1");
		assert_eq!(got[1].node.id, "2");
	}
}
