//! Canvas rendering for the force graph.
//!
//! Handles all drawing operations: background, edges, nodes, labels, and
//! effects. Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge glows, then edge lines (world space)
//! 3. Match glows, non-matched nodes, then matched nodes on top
//! 4. Hover ring and label
//!
//! While a query is active every element blends towards its emphasis tier:
//! direct matches take the accent color, their neighbors the intermediate
//! tone, and the rest recede into the dim color. Links brighten only when
//! an endpoint is a direct match.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::search::Emphasis;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::{Color, Theme};

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			state.width.min(state.height) * 0.3,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.7,
		)
		.unwrap();

	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dash_offset = scale.dash_offset(state.flow_time, config.edge.flow_speed);

	if theme.edge.glow_intensity > 0.0 {
		state.graph.visit_edges(|n1, n2, _| {
			draw_edge_glow(state, ctx, scale, theme, n1, n2);
		});
	}

	state.graph.visit_edges(|n1, n2, _| {
		draw_edge_main(state, ctx, scale, theme, n1, n2, dash_offset);
	});

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge_glow(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	n1: &force_graph::Node<NodeInfo>,
	n2: &force_graph::Node<NodeInfo>,
) {
	let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let strength = smooth_step(state.filter.strength());
	let emphasized = state.filter.link_emphasized(n1.index(), n2.index());

	let glow_alpha = if emphasized {
		theme.edge.glow_intensity * (0.6 + 0.4 * strength)
	} else {
		theme.edge.glow_intensity * (0.6 - 0.5 * strength)
	};
	if glow_alpha < 0.01 {
		return;
	}

	let glow_color = &theme.edge.glow_color;
	ctx.set_stroke_style_str(&format!(
		"rgba({}, {}, {}, {})",
		glow_color.r,
		glow_color.g,
		glow_color.b,
		glow_alpha * glow_color.a
	));
	ctx.set_line_width(scale.edge_line_width * 4.0);
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
	ctx.line_to(x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
	ctx.stroke();
}

fn draw_edge_main(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	n1: &force_graph::Node<NodeInfo>,
	n2: &force_graph::Node<NodeInfo>,
	dash_offset: f64,
) {
	let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let strength = smooth_step(state.filter.strength());
	let emphasized = state.filter.link_emphasized(n1.index(), n2.index());

	// Blend from the resting alpha towards the tier alpha as the filter
	// engages; emphasized edges also thicken slightly.
	let edge_color = &theme.edge.color;
	let target_alpha = if emphasized {
		theme.filter.link_emphasis_alpha
	} else {
		theme.filter.link_dim_alpha
	};
	let alpha = edge_color.a + (target_alpha - edge_color.a) * strength;
	let base_width = if emphasized {
		scale.edge_line_width * (1.0 + 0.4 * strength)
	} else {
		scale.edge_line_width
	};

	// Compensate for dash pattern fading to solid
	let width = base_width * (1.0 + 0.3 * (1.0 - scale.dash_alpha));

	ctx.set_stroke_style_str(&format!(
		"rgba({}, {}, {}, {})",
		edge_color.r, edge_color.g, edge_color.b, alpha
	));
	ctx.set_line_width(width);

	// Fade dash pattern to solid when zoomed out
	let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
	if effective_gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(effective_gap),
		));
		ctx.set_line_dash_offset(dash_offset);
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
	ctx.line_to(x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
	ctx.stroke();
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let strength = smooth_step(state.filter.strength());
	let filtering = strength > 0.01;

	// Pass 1: glow behind direct matches
	if theme.node.glow_intensity > 0.0 && filtering {
		state.graph.visit_nodes(|node| {
			if state.filter.tier(node.index()) == Emphasis::Match {
				draw_node_glow(ctx, node, scale, theme, strength);
			}
		});
	}

	// Pass 2: everything that is not a direct match
	state.graph.visit_nodes(|node| {
		let tier = state.filter.tier(node.index());
		if filtering && tier == Emphasis::Match {
			return;
		}
		let (color, alpha) = tiered_color(node, theme, tier, strength);
		draw_node(ctx, node, scale, theme, color, alpha, 1.0, false);
	});

	// Pass 3: direct matches on top, slightly enlarged, with labels
	if filtering {
		state.graph.visit_nodes(|node| {
			if state.filter.tier(node.index()) != Emphasis::Match {
				return;
			}
			let base = parse_color(&node.data.user_data.color);
			let color = base.lerp(theme.filter.match_color, strength);
			let radius_mult = 1.0 + 0.25 * strength;
			draw_node(ctx, node, scale, theme, color, 1.0, radius_mult, strength > 0.5);
		});
	}

	// Pass 4: hover ring and label for the node under the cursor
	state.graph.visit_nodes(|node| {
		let ring_t = smooth_step(state.hover.ring_intensity(node.index()));
		if ring_t <= 0.01 {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = scale.node_radius * node.data.user_data.size;

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * ring_t));
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.3 * ring_t));
		ctx.set_line_width(scale.ring_width * 0.5);
		ctx.stroke();

		draw_label(ctx, node, scale, radius, 0.95 * ring_t);
	});
}

/// Resting color and alpha for a non-matched node at the current filter
/// strength.
fn tiered_color(
	node: &force_graph::Node<NodeInfo>,
	theme: &Theme,
	tier: Emphasis,
	strength: f64,
) -> (Color, f64) {
	let base = parse_color(&node.data.user_data.color);
	match tier {
		Emphasis::Match => (base.lerp(theme.filter.match_color, strength), 1.0),
		Emphasis::Connected => (base.lerp(theme.filter.connected_color, strength), 1.0),
		Emphasis::Dimmed => (
			base.lerp(theme.filter.dim_color, strength),
			1.0 - 0.25 * strength,
		),
	}
}

fn draw_node_glow(
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	strength: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let radius = scale.node_radius * node.data.user_data.size;
	let glow_radius = radius * 3.0 * (0.5 + 0.5 * strength);
	let alpha = theme.node.glow_intensity * strength * 0.4;
	if alpha < 0.01 {
		return;
	}

	let glow_color = theme.filter.match_color.with_alpha(alpha * theme.node.glow_saturation);
	let white_glow = Color::rgba(255, 255, 255, alpha * 0.3);

	let gradient = ctx
		.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius)
		.unwrap();
	gradient
		.add_color_stop(0.0, &white_glow.lerp(glow_color, 0.5).to_css())
		.unwrap();
	gradient
		.add_color_stop(0.4, &glow_color.with_alpha(alpha * 0.5).to_css())
		.unwrap();
	gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)").unwrap();

	ctx.begin_path();
	let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	color: Color,
	alpha: f64,
	radius_mult: f64,
	labeled: bool,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let radius = scale.node_radius * radius_mult * node.data.user_data.size;

	ctx.set_global_alpha(alpha);

	if theme.node.use_gradient {
		let highlight = color.lighten(0.4);
		let shadow = color.darken(0.2);

		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();
		gradient.add_color_stop(0.0, &highlight.to_css()).unwrap();
		gradient.add_color_stop(0.7, &color.to_css()).unwrap();
		gradient.add_color_stop(1.0, &shadow.to_css()).unwrap();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	} else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill();
	}

	if theme.node.border_width > 0.0 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);

	if labeled {
		draw_label(ctx, node, scale, radius, 0.95 * alpha);
	}
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	radius: f64,
	alpha: f64,
) {
	let label = &node.data.user_data.label;
	if label.is_empty() {
		return;
	}
	let (x, y) = (node.x() as f64, node.y() as f64);
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
	ctx.set_font(&scale.label_font);
	let _ = ctx.fill_text(label, x + radius + 4.0, y + 3.0);
}

/// Parses a CSS color string into a [`Color`].
/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
fn parse_color(color_str: &str) -> Color {
	if color_str.starts_with('#') && color_str.len() == 7 {
		let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
		let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
		let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
		Color::rgb(r, g, b)
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let r = nums
			.first()
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let g = nums
			.get(1)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let b = nums
			.get(2)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0);
		Color::rgba(r, g, b, a)
	} else {
		Color::rgb(128, 128, 128)
	}
}
