//! scad-core - Foundation types for the circuit simulation engine
//!
//! This crate provides the core building blocks every other crate in the
//! workspace builds on:
//!
//! - [`Id`] / [`IdGenerator`] - unique, human-legible identifiers
//! - [`Signal`] - the two-valued logic level every pin and wire carries
//! - [`Component`] - the capability trait every graph node implements
//! - [`ScadError`] - the domain error taxonomy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         scad-core                            │
//! │  ┌─────────┐  ┌─────────────┐  ┌───────────────────────┐   │
//! │  │   Id    │  │   Signal    │  │      ScadError        │   │
//! │  │ (string)│  │ (low/high)  │  │   (domain taxonomy)   │   │
//! │  └─────────┘  └─────────────┘  └───────────────────────┘   │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │                     Component                        │   │
//! │  │     (object-safe capability surface for nodes)       │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod component;
pub mod error;
pub mod id;
pub mod signal;

pub use component::{BranchEndpoints, Component};
pub use error::{MalformedBranchReason, ScadError, ScadResult};
pub use id::{ComponentKind, Id, IdGenerator};
pub use signal::Signal;
