//! Implicit Wire - the contract between the scene flattener and the evaluator
//!
//! This crate fixes everything both sides of the flat scene buffers must
//! agree on, and nothing else:
//!
//! - [`EntityType`] and [`OpType`] tags
//! - Packed leaf parameter records ([`BoxParams`], [`SphereParams`], ...)
//! - The [`OpStep`] program record and its [`Operand`] encoding
//! - [`MAX_ENTITY_COUNT`], the evaluator's fixed leaf capacity
//! - [`wgsl_declarations`], the same contract spelled out for the shader
//!
//! ## Example
//!
//! ```rust
//! use implicit_wire::{EntityType, OpStep, OpType, Operand};
//!
//! assert_eq!(EntityType::Sphere.footprint(), 16);
//!
//! let step = OpStep::new(OpType::Union, Operand::Entity(0), Some(Operand::Entity(1)), [0.0; 6]);
//! assert_eq!(step.operands().count(), 2);
//! ```

mod layout;
mod tags;
mod wgsl;

pub use layout::{
    BoxParams, CylinderParams, HalfspaceParams, OP_DATA_LEN, OpStep, Operand, PeriodicParams,
    SphereParams,
};
pub use tags::{EntityType, OpType};
pub use wgsl::wgsl_declarations;

/// Maximum number of leaf entities the evaluator's buffers can hold
pub const MAX_ENTITY_COUNT: usize = 32;
