//! scad - a digital logic circuit editor and simulator.
//!
//! The library is split into:
//! - `scad-core` - identity, signal, and component types
//! - `scad-components` - concrete pins, gates, and branches
//! - `scad-graph` - the signal graph, command/undo model, composite gates,
//!   and persistence

pub use scad_components as components;
pub use scad_core as core;
pub use scad_graph as graph;
