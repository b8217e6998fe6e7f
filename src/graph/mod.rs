//! Contact graph data model.
//!
//! Mirrors the backend snapshot JSON: camelCase contact nodes plus links
//! whose endpoints arrive either as bare ids or as embedded node objects.
//! Endpoints are normalized to a single id form while deserializing, so no
//! downstream code inspects the shape again.

use serde::{Deserialize, Deserializer, Serialize};

pub mod search;
pub mod suggest;

/// One meeting extracted from the user's email history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meeting {
	pub date: String,
	pub title: String,
	pub location: String,
}

/// A contact in the network graph.
///
/// Identity is `id`; every other field is editable metadata. The backend
/// back-fills missing fields with empty values, and deserialization here
/// does the same.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactNode {
	pub id: String,
	pub name: String,
	pub email: String,
	pub company: String,
	pub company_domain: String,
	pub first_name: String,
	pub last_name: String,
	pub linkedin_url: String,
	pub notes: String,
	pub meetings: Vec<Meeting>,
}

impl ContactNode {
	/// Label shown next to the node on the canvas: the display name, or the
	/// email when no name was extracted.
	pub fn label(&self) -> &str {
		if self.name.is_empty() {
			&self.email
		} else {
			&self.name
		}
	}
}

/// A link endpoint, held as the referenced node id.
///
/// The backend emits endpoints as bare id strings, but once a snapshot has
/// round-tripped through a physics layer they can come back as embedded
/// objects carrying an `id` field. Both forms deserialize here; anything
/// else is rejected with the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkEnd(String);

impl LinkEnd {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnd {
	Id(String),
	Embedded { id: String },
}

impl<'de> Deserialize<'de> for LinkEnd {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		RawEnd::deserialize(deserializer).map(|raw| match raw {
			RawEnd::Id(id) | RawEnd::Embedded { id } => LinkEnd(id),
		})
	}
}

/// One relationship edge between two contacts. Endpoints are unordered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	pub source: LinkEnd,
	pub target: LinkEnd,
}

/// Complete graph snapshot as fetched from the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphData {
	pub nodes: Vec<ContactNode>,
	pub links: Vec<GraphLink>,
	/// Set while the backend is still building the node/link sets.
	pub is_generating: bool,
	/// Progress percentage reported alongside an in-flight generation.
	pub current_progress: Option<f64>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	pub fn node_by_id(&self, id: &str) -> Option<&ContactNode> {
		self.nodes.iter().find(|node| node.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_camel_case_contact() {
		let json = r#"{
			"id": "ada@example.com",
			"name": "Ada Lovelace",
			"email": "ada@example.com",
			"company": "Analytical Engines",
			"companyDomain": "example.com",
			"firstName": "Ada",
			"lastName": "Lovelace",
			"linkedinUrl": "https://linkedin.com/in/ada",
			"notes": "met at conference",
			"meetings": [{"date": "2024-03-01", "title": "Sync", "location": "Zoom"}]
		}"#;
		let node: ContactNode = serde_json::from_str(json).unwrap();
		assert_eq!(node.company_domain, "example.com");
		assert_eq!(node.first_name, "Ada");
		assert_eq!(node.linkedin_url, "https://linkedin.com/in/ada");
		assert_eq!(node.meetings.len(), 1);
		assert_eq!(node.meetings[0].title, "Sync");
	}

	#[test]
	fn missing_contact_fields_default_to_empty() {
		let node: ContactNode = serde_json::from_str(r#"{"id": "x@y.com"}"#).unwrap();
		assert_eq!(node.id, "x@y.com");
		assert_eq!(node.name, "");
		assert!(node.meetings.is_empty());
	}

	#[test]
	fn link_endpoints_accept_both_forms() {
		let bare: GraphLink = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
		let embedded: GraphLink =
			serde_json::from_str(r#"{"source": "a", "target": {"id": "b", "x": 3.5}}"#).unwrap();
		assert_eq!(bare, embedded);
		assert_eq!(embedded.target.as_str(), "b");
	}

	#[test]
	fn malformed_link_endpoint_is_rejected() {
		assert!(serde_json::from_str::<GraphLink>(r#"{"source": "a", "target": 7}"#).is_err());
		assert!(serde_json::from_str::<GraphLink>(r#"{"source": "a", "target": {"x": 1}}"#).is_err());
	}

	#[test]
	fn link_ends_serialize_back_to_bare_ids() {
		let link: GraphLink =
			serde_json::from_str(r#"{"source": {"id": "a"}, "target": "b"}"#).unwrap();
		let json = serde_json::to_string(&link).unwrap();
		assert_eq!(json, r#"{"source":"a","target":"b"}"#);
	}

	#[test]
	fn snapshot_carries_generation_flags() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [], "links": [], "is_generating": true, "current_progress": 42.0}"#,
		)
		.unwrap();
		assert!(data.is_generating);
		assert_eq!(data.current_progress, Some(42.0));
		assert!(data.is_empty());

		let bare: GraphData = serde_json::from_str(r#"{"nodes": [], "links": []}"#).unwrap();
		assert!(!bare.is_generating);
		assert_eq!(bare.current_progress, None);
	}

	#[test]
	fn label_falls_back_to_email() {
		let node = ContactNode {
			id: "x".into(),
			email: "x@y.com".into(),
			..Default::default()
		};
		assert_eq!(node.label(), "x@y.com");
	}
}
