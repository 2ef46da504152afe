//! Packed record layouts
//!
//! Every record is `repr(C)` over 4-byte fields only, so there is no padding
//! and `bytemuck::bytes_of` yields exactly the bytes the evaluator reads.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::tags::OpType;

/// Axis-aligned box given by its two corners
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BoxParams {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SphereParams {
    pub center: [f32; 3],
    pub radius: f32,
}

/// Capped cylinder between two endpoints
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CylinderParams {
    pub point1: [f32; 3],
    pub point2: [f32; 3],
    pub radius: f32,
}

/// Shared by the gyroid and Schwarz P triply periodic surfaces
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PeriodicParams {
    pub scale: f32,
    pub thickness: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct HalfspaceParams {
    pub origin: [f32; 3],
    pub normal: [f32; 3],
}

/// Number of floats in an `OpStep` payload
pub const OP_DATA_LEN: usize = 6;

/// One instruction of the flattened evaluation program.
///
/// `data` layout depends on `op_type`:
/// - union / intersection / subtraction: `[blend_radius, 0, 0, 0, 0, 0]`
/// - offset: `[distance, 0, 0, 0, 0, 0]`
/// - linblend / smoothblend: `[p1.x, p1.y, p1.z, p2.x, p2.y, p2.z]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OpStep {
    pub op_type: u32,
    pub left: u32,
    pub right: u32,
    pub data: [f32; OP_DATA_LEN],
}

impl OpStep {
    pub fn new(
        op_type: OpType,
        left: Operand,
        right: Option<Operand>,
        data: [f32; OP_DATA_LEN],
    ) -> Self {
        Self {
            op_type: op_type.as_u32(),
            left: left.encode(),
            right: right.map_or(Operand::NONE, Operand::encode),
            data,
        }
    }

    pub fn op(&self) -> Option<OpType> {
        OpType::from_u32(self.op_type)
    }

    pub fn left_operand(&self) -> Option<Operand> {
        Operand::decode(self.left)
    }

    /// `None` for unary steps
    pub fn right_operand(&self) -> Option<Operand> {
        Operand::decode(self.right)
    }

    /// Operands in evaluation order
    pub fn operands(&self) -> impl Iterator<Item = Operand> {
        self.left_operand().into_iter().chain(self.right_operand())
    }
}

/// Where a result lives for a later step: a leaf's entity index, or the
/// index of an earlier step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Entity(u32),
    Step(u32),
}

impl Operand {
    /// Encoded value of an absent operand
    pub const NONE: u32 = u32::MAX;

    /// High bit set means the low bits index `steps`, clear means `offsets`/`types`
    pub const STEP_FLAG: u32 = 0x8000_0000;

    pub fn encode(self) -> u32 {
        match self {
            Self::Entity(index) => index & !Self::STEP_FLAG,
            Self::Step(index) => (index & !Self::STEP_FLAG) | Self::STEP_FLAG,
        }
    }

    pub fn decode(raw: u32) -> Option<Self> {
        if raw == Self::NONE {
            None
        } else if raw & Self::STEP_FLAG != 0 {
            Some(Self::Step(raw & !Self::STEP_FLAG))
        } else {
            Some(Self::Entity(raw))
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::Entity(index) | Self::Step(index) => index,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(index) => write!(f, "e{index}"),
            Self::Step(index) => write!(f, "s{index}"),
        }
    }
}
