//! UI components.

pub mod details_panel;
pub mod force_graph;
pub mod loading;
pub mod login;
pub mod search_bar;
