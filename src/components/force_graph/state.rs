//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-contact metadata,
//! view transforms for pan/zoom, hover tracking, and the query-driven
//! emphasis tiers with smooth intensity transitions.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::GraphData;
use crate::graph::search::{Emphasis, HighlightSets};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Contact id, used to map emphasis sets onto simulation indices.
	pub id: String,
	/// Label drawn next to emphasized or hovered nodes.
	pub label: String,
	/// Base palette color before any filter blending.
	pub color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more connected)
	pub size: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Whether the pointer traveled far enough to count as a drag rather
	/// than a click.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Minimum time (seconds) a hover ring must be held before it can fade out.
/// This prevents flashing when the mouse briefly touches a hover zone.
const MIN_HOLD_TIME: f64 = 0.12;

// Smoothing factors - higher = faster response.
// At 60fps with speed=6: reaches ~95% in ~150ms.
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Smoothed hover-ring intensity for the node under the cursor.
///
/// Each recently hovered node keeps its own intensity value (0.0 to 1.0)
/// animated with exponential smoothing, plus a minimum hold time so the
/// ring doesn't flash when the mouse skirts the edge of a hover zone.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Currently hovered node (if any)
	pub hovered: Option<DefaultNodeIdx>,
	ring: HashMap<DefaultNodeIdx, f64>,
	hold: HashMap<DefaultNodeIdx, f64>,
}

impl HoverState {
	/// Update the hovered node.
	pub fn set(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		if let Some(idx) = node {
			self.hold.insert(idx, MIN_HOLD_TIME);
		}
	}

	/// Animate ring intensities towards their targets.
	///
	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) {
		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		if let Some(idx) = self.hovered {
			let intensity = self.ring.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		let hovered = self.hovered;
		self.hold.retain(|idx, timer| {
			if hovered == Some(*idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let hold = &self.hold;
		self.ring.retain(|idx, intensity| {
			if hovered == Some(*idx) {
				return true;
			}
			if !hold.contains_key(idx) {
				*intensity *= fade_out_decay;
			}
			*intensity > 0.005 // Keep only if still visible
		});
	}

	/// Get the ring intensity for a specific node (already smoothed).
	pub fn ring_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.ring.get(&idx).copied().unwrap_or(0.0)
	}
}

/// Query-driven emphasis tiers with a smoothed blend strength.
///
/// Tier assignment is discrete per query; the blend towards the tier
/// colors eases exponentially so filter changes fade in and out rather
/// than snap. Stale tiers are kept through the fade-out so colors recede
/// from where they were.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
	tiers: HashMap<DefaultNodeIdx, Emphasis>,
	active: bool,
	strength: f64,
}

impl FilterState {
	/// Replace the tier assignment from a fresh highlight computation.
	pub fn set(&mut self, sets: &HighlightSets, ids: &HashMap<String, DefaultNodeIdx>) {
		self.active = sets.is_active();
		if !self.active {
			// Keep the old tiers; tick() fades them out and clears.
			return;
		}
		self.tiers.clear();
		for (id, &idx) in ids {
			self.tiers.insert(idx, sets.node_emphasis(id));
		}
	}

	/// Animate the blend strength towards 1.0 (active) or 0.0 (inactive).
	pub fn tick(&mut self, dt: f64) {
		let (target, speed) = if self.active {
			(1.0, FADE_IN_SPEED)
		} else {
			(0.0, FADE_OUT_SPEED)
		};
		self.strength += (target - self.strength) * (1.0 - (-speed * dt).exp());
		if !self.active && self.strength < 0.005 {
			self.strength = 0.0;
			self.tiers.clear();
		}
	}

	/// Blend strength towards the tier colors, 0.0 to 1.0.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// Tier for a node. Nodes the assignment never saw count as dimmed.
	pub fn tier(&self, idx: DefaultNodeIdx) -> Emphasis {
		self.tiers.get(&idx).copied().unwrap_or(Emphasis::Dimmed)
	}

	/// Link emphasis follows the match set only.
	pub fn link_emphasized(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> bool {
		self.tier(a) == Emphasis::Match || self.tier(b) == Emphasis::Match
	}
}

/// Core graph state combining physics simulation with interaction and
/// emphasis tracking.
///
/// Created when the component mounts and rebuilt whenever a new snapshot
/// replaces the graph, then mutated each frame by the animation loop.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub filter: FilterState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, theme: &Theme) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();

		// Count edges per contact for importance sizing
		let mut edge_counts: HashMap<&str, usize> = HashMap::new();
		for link in &data.links {
			*edge_counts.entry(link.source.as_str()).or_insert(0) += 1;
			*edge_counts.entry(link.target.as_str()).or_insert(0) += 1;
		}
		let max_edges = edge_counts.values().copied().max().unwrap_or(1).max(1);

		for (i, node) in data.nodes.iter().enumerate() {
			let color = theme.palette.get(i).to_css_rgb();
			let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);

			// Well-connected contacts render larger; sqrt for softer scaling
			let node_edges = edge_counts.get(node.id.as_str()).copied().unwrap_or(0);
			let edge_factor = (node_edges as f64 / max_edges as f64).sqrt();
			let size = 0.8 + 0.7 * edge_factor;

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label().to_string(),
					color,
					size,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			id_to_idx,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			filter: FilterState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Contact id of a simulation node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover.set(node);
	}

	/// Apply a fresh highlight computation to the emphasis tiers.
	pub fn set_filter(&mut self, sets: &HighlightSets) {
		self.filter.set(sets, &self.id_to_idx);
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
		self.hover.tick(dt as f64);
		self.filter.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
