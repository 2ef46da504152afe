//! Implicit Scene - CSG trees of implicit primitives, flattened for the GPU
//!
//! A scene is an [`Entity`] tree: leaf primitives (box, sphere, cylinder,
//! gyroid, Schwarz P, half-space) combined by composites carrying an
//! [`Operation`]. The tree is flattened in two passes into the buffers the
//! raymarching evaluator reads:
//!
//! 1. [`Entity::render_sizes`] counts bytes, leaves and steps
//! 2. [`Entity::serialize_into`] (or [`Entity::flatten`]) writes them in
//!    post-order, so composites become a linear program of [`OpStep`]s
//!
//! ## Example
//!
//! ```rust
//! use glam::Vec3;
//! use implicit_scene::{BooleanOp, box3, make_combine, sphere};
//!
//! let scene = make_combine(
//!     box3(Vec3::ZERO, Vec3::ONE),
//!     sphere(Vec3::ZERO, 0.5),
//!     BooleanOp::Union,
//! )?;
//!
//! let sizes = scene.render_sizes()?;
//! assert_eq!((sizes.bytes, sizes.entities, sizes.steps), (40, 2, 1));
//!
//! let flat = scene.flatten()?;
//! assert_eq!(flat.offsets(), &[0, 24]);
//! # Ok::<(), implicit_scene::Error>(())
//! ```
//!
//! ## Limits
//!
//! A tree may reach at most [`MAX_ENTITY_COUNT`] leaves, counting a shared
//! subtree once per place it is used. Builders refuse to create anything
//! larger.

mod entity;
mod error;
mod flatten;
mod operation;
mod primitive;
mod scene;

pub use entity::{
    Composite, Entity, Node, make_combine, make_linear_blend, make_offset, make_smooth_blend,
};
pub use error::{Error, Result};
pub use flatten::{FlattenContext, RenderSizes};
pub use operation::{BooleanOp, Operation};
pub use primitive::{Primitive, box3, cylinder, gyroid, halfspace, schwarz, sphere};
pub use scene::FlatScene;

// Re-export the wire contract so callers need only this crate
pub use implicit_wire::{EntityType, MAX_ENTITY_COUNT, OP_DATA_LEN, OpStep, OpType, Operand};
