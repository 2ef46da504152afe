//! Implicit Script - Rhai scripting for scene trees
//!
//! Lets a scene be written as a script whose last expression is the root
//! entity. Scripts are evaluated into [`Entity`] trees and can be flattened
//! straight into evaluator buffers.
//!
//! ## Example Script
//!
//! ```rhai
//! // A rounded block with a gyroid lattice inside
//! let block = box3(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
//! let lattice = gyroid(4.0, 0.08);
//!
//! // Keep the lattice only inside the block, then thicken it
//! block
//!     .intersect(lattice, 0.05)
//!     .offset(0.02)
//! ```
//!
//! ## Precision Notes
//!
//! Rhai scripts use `f64` for numeric literals, but all values are
//! converted to `f32` when constructing entities, matching the `f32`
//! layout the evaluator reads. Numeric arguments must be written as
//! float literals (`1.0`, not `1`).

pub mod engine;
pub mod scene_api;

pub use engine::ScriptEngine;
pub use scene_api::{ScriptEntity, ScriptVec3, register_scene_api};

// Re-export for convenience
pub use implicit_scene::{Entity, FlatScene};
