//! Error types for scene construction and flattening

use implicit_wire::{OpType, Operand};
use thiserror::Error;

/// Result type alias using the scene's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or flattening a scene
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A composite was given the wrong number of children for its operation
    #[error("{op} takes {expected} operand(s) but {found} were given")]
    Arity {
        op: OpType,
        expected: usize,
        found: usize,
    },

    /// The tree holds more leaves than the evaluator can store
    #[error("scene has {count} leaf entities, the evaluator holds at most {max}")]
    CapacityExceeded { count: usize, max: usize },

    /// A caller-provided output buffer does not match the accounted size
    #[error("{buffer} buffer has length {actual}, expected {expected}")]
    BufferSize {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A leaf's tag in the `types` buffer is not a leaf kind
    #[error("e{entity} has non-leaf tag {tag}")]
    InvalidLeafTag { entity: usize, tag: u8 },

    /// A leaf's parameters do not start where the previous leaf's end
    #[error("e{entity} starts at byte {offset}, expected {expected}")]
    MisplacedLeaf {
        entity: usize,
        offset: usize,
        expected: usize,
    },

    /// The leaf regions do not cover the `bytes` buffer exactly
    #[error("leaves cover {covered} of {len} parameter bytes")]
    UncoveredBytes { covered: usize, len: usize },

    /// A step carries an unknown or empty operation tag
    #[error("s{step} has invalid op tag {op_type}")]
    InvalidOpTag { step: usize, op_type: u32 },

    /// A step's operand count disagrees with its operation
    #[error("s{step} ({op}) has {found} operand(s), expected {expected}")]
    StepOperands {
        step: usize,
        op: OpType,
        expected: usize,
        found: usize,
    },

    /// A step reads a leaf that does not exist or a step that runs later
    #[error("s{step} reads {operand} before it is produced")]
    ForwardReference { step: usize, operand: Operand },

    /// The root operand names nothing in the buffers
    #[error("root {root} is not produced by the program")]
    DanglingRoot { root: Operand },
}
