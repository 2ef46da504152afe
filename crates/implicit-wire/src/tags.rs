//! Type tags for entities and operations
//!
//! Both enums are `repr(u8)` / `repr(u32)` so the discriminant is the value
//! the evaluator switches on.

use std::fmt;

use crate::layout::{BoxParams, CylinderParams, HalfspaceParams, PeriodicParams, SphereParams};

/// Entity kind tag written into the `types` buffer.
///
/// `Csg` marks a composite and never appears in the `types` buffer itself,
/// since only leaves are listed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityType {
    Csg = 0,
    Box = 1,
    Sphere = 2,
    Cylinder = 3,
    Gyroid = 4,
    Schwarz = 5,
    Halfspace = 6,
}

impl EntityType {
    pub const LEAVES: [EntityType; 6] = [
        EntityType::Box,
        EntityType::Sphere,
        EntityType::Cylinder,
        EntityType::Gyroid,
        EntityType::Schwarz,
        EntityType::Halfspace,
    ];

    /// Decode a tag read back from a `types` buffer
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Csg),
            1 => Some(Self::Box),
            2 => Some(Self::Sphere),
            3 => Some(Self::Cylinder),
            4 => Some(Self::Gyroid),
            5 => Some(Self::Schwarz),
            6 => Some(Self::Halfspace),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_leaf(self) -> bool {
        self != Self::Csg
    }

    /// Number of parameter bytes a leaf of this kind occupies in the `bytes`
    /// buffer. Composites own no parameter bytes.
    pub fn footprint(self) -> usize {
        match self {
            Self::Csg => 0,
            Self::Box => size_of::<BoxParams>(),
            Self::Sphere => size_of::<SphereParams>(),
            Self::Cylinder => size_of::<CylinderParams>(),
            Self::Gyroid | Self::Schwarz => size_of::<PeriodicParams>(),
            Self::Halfspace => size_of::<HalfspaceParams>(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Csg => "csg",
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Gyroid => "gyroid",
            Self::Schwarz => "schwarz",
            Self::Halfspace => "halfspace",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation tag written into `OpStep::op_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OpType {
    None = 0,
    Union = 1,
    Intersection = 2,
    Subtraction = 3,
    Offset = 4,
    LinBlend = 5,
    SmoothBlend = 6,
}

impl OpType {
    pub const ALL: [OpType; 6] = [
        OpType::Union,
        OpType::Intersection,
        OpType::Subtraction,
        OpType::Offset,
        OpType::LinBlend,
        OpType::SmoothBlend,
    ];

    pub fn from_u32(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::Union),
            2 => Some(Self::Intersection),
            3 => Some(Self::Subtraction),
            4 => Some(Self::Offset),
            5 => Some(Self::LinBlend),
            6 => Some(Self::SmoothBlend),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Number of operands a step with this tag consumes
    pub fn arity(self) -> usize {
        match self {
            Self::None => 0,
            Self::Offset => 1,
            Self::Union
            | Self::Intersection
            | Self::Subtraction
            | Self::LinBlend
            | Self::SmoothBlend => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Subtraction => "subtraction",
            Self::Offset => "offset",
            Self::LinBlend => "linblend",
            Self::SmoothBlend => "smoothblend",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
