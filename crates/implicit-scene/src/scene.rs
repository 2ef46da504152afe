//! Owned flat scene buffers
//!
//! [`FlatScene`] is what [`Entity::flatten`](crate::Entity::flatten) hands
//! back: the four buffers plus the operand holding the root's result. Its
//! `Display` impl prints the program one line per leaf and step.

use std::fmt;

use implicit_wire::{EntityType, OpStep, OpType, Operand};

use crate::error::{Error, Result};
use crate::flatten::RenderSizes;

/// The four flat buffers of a scene and the operand of its root
#[derive(Debug, Clone, PartialEq)]
pub struct FlatScene {
    bytes: Vec<u8>,
    offsets: Vec<u32>,
    types: Vec<u8>,
    steps: Vec<OpStep>,
    root: Operand,
}

impl FlatScene {
    pub(crate) fn from_parts(
        bytes: Vec<u8>,
        offsets: Vec<u32>,
        types: Vec<u8>,
        steps: Vec<OpStep>,
        root: Operand,
    ) -> Self {
        Self {
            bytes,
            offsets,
            types,
            steps,
            root,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn types(&self) -> &[u8] {
        &self.types
    }

    pub fn steps(&self) -> &[OpStep] {
        &self.steps
    }

    /// `steps` as raw bytes, ready for a storage buffer upload
    pub fn step_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.steps)
    }

    /// Where the evaluator finds the whole scene's result
    pub fn root(&self) -> Operand {
        self.root
    }

    pub fn sizes(&self) -> RenderSizes {
        RenderSizes {
            bytes: self.bytes.len(),
            entities: self.types.len(),
            steps: self.steps.len(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.types.len()
    }

    pub fn leaf_type(&self, index: usize) -> Option<EntityType> {
        self.types.get(index).copied().and_then(EntityType::from_u8)
    }

    /// Parameter bytes of leaf `index`
    pub fn leaf_params(&self, index: usize) -> Option<&[u8]> {
        let start = *self.offsets.get(index)? as usize;
        let end = start + self.leaf_type(index)?.footprint();
        self.bytes.get(start..end)
    }

    /// Re-check the layout invariants the evaluator depends on: leaf regions
    /// are contiguous and cover `bytes`, every tag is a leaf tag, and every
    /// step operand refers to a leaf or an earlier step.
    pub fn validate(&self) -> Result<()> {
        if self.offsets.len() != self.types.len() {
            return Err(Error::BufferSize {
                buffer: "offsets",
                expected: self.types.len(),
                actual: self.offsets.len(),
            });
        }

        let mut cursor = 0usize;
        for (entity, (&offset, &tag)) in self.offsets.iter().zip(&self.types).enumerate() {
            let ty = EntityType::from_u8(tag)
                .filter(|ty| ty.is_leaf())
                .ok_or(Error::InvalidLeafTag { entity, tag })?;
            if offset as usize != cursor {
                return Err(Error::MisplacedLeaf {
                    entity,
                    offset: offset as usize,
                    expected: cursor,
                });
            }
            cursor += ty.footprint();
        }
        if cursor != self.bytes.len() {
            return Err(Error::UncoveredBytes {
                covered: cursor,
                len: self.bytes.len(),
            });
        }

        for (step, record) in self.steps.iter().enumerate() {
            let op = record
                .op()
                .filter(|op| *op != OpType::None)
                .ok_or(Error::InvalidOpTag {
                    step,
                    op_type: record.op_type,
                })?;
            let found = record.operands().count();
            if record.left_operand().is_none() || found != op.arity() {
                return Err(Error::StepOperands {
                    step,
                    op,
                    expected: op.arity(),
                    found,
                });
            }
            for operand in record.operands() {
                if !self.is_produced_before(operand, step) {
                    return Err(Error::ForwardReference { step, operand });
                }
            }
        }

        if self.is_produced_before(self.root, self.steps.len()) {
            Ok(())
        } else {
            Err(Error::DanglingRoot { root: self.root })
        }
    }

    /// Whether `operand` names an existing leaf or a step before `before`
    fn is_produced_before(&self, operand: Operand, before: usize) -> bool {
        match operand {
            Operand::Entity(i) => (i as usize) < self.types.len(),
            Operand::Step(j) => (j as usize) < before,
        }
    }
}

impl fmt::Display for FlatScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes = self.sizes();
        writeln!(
            f,
            "entities: {}, steps: {}, bytes: {}",
            sizes.entities, sizes.steps, sizes.bytes
        )?;

        for index in 0..self.entity_count() {
            let start = self.offsets[index] as usize;
            match self.leaf_type(index) {
                Some(ty) => writeln!(
                    f,
                    "e{index} = {ty} [{start}..{})",
                    start + ty.footprint()
                )?,
                None => writeln!(f, "e{index} = ? (tag {})", self.types[index])?,
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.op().map_or("?", OpType::name);
            let operands = step
                .operands()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let d = &step.data;
            match step.op() {
                Some(OpType::Union | OpType::Intersection | OpType::Subtraction) => {
                    writeln!(f, "s{index} = {name}({operands}) r={}", d[0])?;
                }
                Some(OpType::Offset) => {
                    writeln!(f, "s{index} = {name}({operands}) d={}", d[0])?;
                }
                Some(OpType::LinBlend | OpType::SmoothBlend) => writeln!(
                    f,
                    "s{index} = {name}({operands}) p1=({}, {}, {}) p2=({}, {}, {})",
                    d[0], d[1], d[2], d[3], d[4], d[5]
                )?,
                _ => writeln!(f, "s{index} = {name}({operands})")?,
            }
        }

        write!(f, "root = {}", self.root)
    }
}
