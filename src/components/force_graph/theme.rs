//! Visual theming for the force graph.
//!
//! Provides color palettes, gradients, and visual style configuration,
//! including the colors for the three search-emphasis tiers.

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// A curated color palette for nodes.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Ocean depths palette - blues and teals
	pub fn ocean() -> Self {
		Self {
			colors: vec![
				Color::rgb(70, 110, 140),  // Deep blue
				Color::rgb(80, 130, 150),  // Cerulean
				Color::rgb(100, 145, 160), // Steel teal
				Color::rgb(90, 125, 145),  // Slate blue
				Color::rgb(85, 135, 155),  // Ocean
				Color::rgb(95, 120, 140),  // Denim
				Color::rgb(75, 115, 135),  // Navy gray
				Color::rgb(88, 128, 148),  // Cadet
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge color
	pub color: Color,
	/// Glow color (usually lighter version)
	pub glow_color: Color,
	/// Edge glow intensity
	pub glow_intensity: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Outer glow intensity for matched nodes
	pub glow_intensity: f64,
	/// Glow color multiplier (how much node color affects glow)
	pub glow_saturation: f64,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
}

/// Colors for the query-driven emphasis tiers.
///
/// Direct matches take the accent color, their neighbors an intermediate
/// tone, and everything else recedes into the dim color while a query is
/// active.
#[derive(Clone, Debug)]
pub struct FilterStyle {
	/// Direct match accent.
	pub match_color: Color,
	/// One link away from a match.
	pub connected_color: Color,
	/// Unrelated nodes while filtering.
	pub dim_color: Color,
	/// Link alpha when an endpoint is a direct match.
	pub link_emphasis_alpha: f64,
	/// Link alpha for everything else while filtering.
	pub link_dim_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub filter: FilterStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Clean modern theme with subtle effects (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(17, 24, 39),
				color_secondary: Color::rgb(26, 33, 48),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(255, 255, 255, 0.2),
				glow_color: Color::rgba(140, 160, 180, 0.1),
				glow_intensity: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				glow_intensity: 0.5,
				glow_saturation: 0.8,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
			},
			filter: FilterStyle {
				match_color: Color::rgb(96, 165, 250),
				connected_color: Color::rgb(56, 116, 201),
				dim_color: Color::rgb(31, 41, 55),
				link_emphasis_alpha: 0.6,
				link_dim_alpha: 0.05,
			},
			palette: NodePalette::slate(),
		}
	}

	/// Elegant dark theme with deeper blues
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
				vignette: 0.2,
			},
			edge: EdgeStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				glow_color: Color::rgba(100, 120, 150, 0.1),
				glow_intensity: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				glow_intensity: 0.4,
				glow_saturation: 0.7,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
			},
			filter: FilterStyle {
				match_color: Color::rgb(125, 160, 220),
				connected_color: Color::rgb(80, 110, 170),
				dim_color: Color::rgb(35, 40, 55),
				link_emphasis_alpha: 0.55,
				link_dim_alpha: 0.05,
			},
			palette: NodePalette::ocean(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
