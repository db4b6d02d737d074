//! # tensegrity-spine
//!
//! An engine-agnostic model layer for a multi-segment tensegrity spine built
//! from tetrahedral vertebrae and cable "muscles".
//!
//! It decouples the declarative model (nodes, tagged rod and cable pairs)
//! from the physics simulation, producing a `SpineBlueprint` that can be
//! ingested by rigid-body engines. Collision detection, constraint solving,
//! and integration stay with the engine; this crate covers node placement,
//! tagging, structure-to-rigid-body translation, and muscle mapping.

pub mod blueprint;
pub mod config;
pub mod error;
pub mod model;
pub mod spine;
pub mod structure;

pub use blueprint::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use spine::*;
pub use structure::*;
