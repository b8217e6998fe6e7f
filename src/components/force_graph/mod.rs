//! Force-directed graph visualization component.
//!
//! Renders an interactive contact graph on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Pan, zoom, node dragging, and click-to-select interactions
//! - Three-tier search emphasis (match / connected / dimmed) with smooth
//!   transitions
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use beyond_meet::components::force_graph::ForceGraphCanvas;
//!
//! view! {
//!     <ForceGraphCanvas
//!         data=graph_signal
//!         highlight=highlight_signal
//!         on_select=on_node_select
//!         fullscreen=true
//!     />
//! }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
