//! Operation descriptors
//!
//! An [`Operation`] names one CSG combinator and carries its parameters. It
//! is copied verbatim into the [`OpStep`](implicit_wire::OpStep) a composite
//! emits when flattened.

use glam::Vec3;
use implicit_wire::{OP_DATA_LEN, OpType};

/// Boolean combinators, usable with or without a blend radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersection,
    Subtraction,
}

impl BooleanOp {
    pub fn op_type(self) -> OpType {
        match self {
            Self::Union => OpType::Union,
            Self::Intersection => OpType::Intersection,
            Self::Subtraction => OpType::Subtraction,
        }
    }

    /// Sharp combination, equivalent to `blended(0.0)`
    pub fn sharp(self) -> Operation {
        self.blended(0.0)
    }

    pub fn blended(self, blend_radius: f32) -> Operation {
        Operation::Combine {
            op: self,
            blend_radius,
        }
    }
}

/// A CSG combinator and its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Boolean combination. A zero radius is a sharp result.
    Combine { op: BooleanOp, blend_radius: f32 },
    /// Uniform surface offset of a single child
    Offset { distance: f32 },
    /// Linear blend between the children along `p1` -> `p2`
    LinearBlend { p1: Vec3, p2: Vec3 },
    /// Smoothstep blend between the children along `p1` -> `p2`
    SmoothBlend { p1: Vec3, p2: Vec3 },
}

impl Operation {
    pub fn op_type(&self) -> OpType {
        match self {
            Self::Combine { op, .. } => op.op_type(),
            Self::Offset { .. } => OpType::Offset,
            Self::LinearBlend { .. } => OpType::LinBlend,
            Self::SmoothBlend { .. } => OpType::SmoothBlend,
        }
    }

    pub fn arity(&self) -> usize {
        self.op_type().arity()
    }

    pub fn is_unary(&self) -> bool {
        self.arity() == 1
    }

    /// The step payload, laid out as documented on `OpStep`
    pub fn payload(&self) -> [f32; OP_DATA_LEN] {
        match *self {
            Self::Combine { blend_radius, .. } => [blend_radius, 0.0, 0.0, 0.0, 0.0, 0.0],
            Self::Offset { distance } => [distance, 0.0, 0.0, 0.0, 0.0, 0.0],
            Self::LinearBlend { p1, p2 } | Self::SmoothBlend { p1, p2 } => {
                [p1.x, p1.y, p1.z, p2.x, p2.y, p2.z]
            }
        }
    }
}

impl From<BooleanOp> for Operation {
    fn from(op: BooleanOp) -> Self {
        op.sharp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_op_defaults_to_sharp() {
        let op: Operation = BooleanOp::Subtraction.into();
        assert_eq!(
            op,
            Operation::Combine {
                op: BooleanOp::Subtraction,
                blend_radius: 0.0
            }
        );
        assert_eq!(op.op_type(), OpType::Subtraction);
    }

    #[test]
    fn zero_radius_payload_is_bitwise_zero() {
        let payload = BooleanOp::Union.sharp().payload();
        assert!(payload.iter().all(|v| v.to_bits() == 0));
    }

    #[test]
    fn blend_payload_carries_both_points() {
        let op = Operation::SmoothBlend {
            p1: Vec3::new(1.0, 2.0, 3.0),
            p2: Vec3::new(4.0, 5.0, 6.0),
        };
        assert_eq!(op.payload(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(op.arity(), 2);
    }

    #[test]
    fn only_offset_is_unary() {
        assert!(Operation::Offset { distance: 0.1 }.is_unary());
        assert!(!BooleanOp::Intersection.blended(0.3).is_unary());
        assert!(
            !Operation::LinearBlend {
                p1: Vec3::ZERO,
                p2: Vec3::X
            }
            .is_unary()
        );
    }
}
