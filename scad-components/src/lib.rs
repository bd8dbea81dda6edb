//! scad-components - Concrete signal-graph node implementations
//!
//! This crate provides the [`scad_core::Component`] implementations the
//! graph actually stores:
//!
//! - [`InputPin`] / [`OutputPin`] - sources and sinks
//! - [`PrimitiveGate`] - fixed-arity combinational gates (AND, OR, NOT, ...)
//! - [`Branch`] - the directed wire between two component slots
//!
//! Composite gates live in `scad-graph`, since they wrap a `CircuitGraph`.

pub mod branch;
pub mod gate;
pub mod pin;

pub use branch::Branch;
pub use gate::{GateKind, PrimitiveGate};
pub use pin::{InputPin, OutputPin};
