//! Two-pass flattening of an entity tree
//!
//! 1. [`Entity::accumulate_size`] walks the tree once and totals the bytes,
//!    leaf entities and steps the output needs.
//! 2. [`Entity::serialize`] walks it again in post-order and fills four
//!    parallel buffers:
//!
//! ```text
//! bytes   [u8]      packed leaf parameters, back to back
//! offsets [u32]     per leaf, start of its parameters in `bytes`
//! types   [u8]      per leaf, its EntityType tag
//! steps   [OpStep]  per composite, one instruction referencing earlier results
//! ```
//!
//! Leaves report `Operand::Entity(i)` and composites `Operand::Step(j)` to
//! their parent, so a step addresses raw leaves and intermediate results the
//! same way. Walking `steps` front to back is a valid evaluation order.
//!
//! A subtree held by several parents is written once per place it is
//! reached. Nothing is cached across occurrences, which keeps the serialized
//! lengths equal to what `accumulate_size` counted.

use bytemuck::Zeroable;
use implicit_wire::{MAX_ENTITY_COUNT, OpStep, Operand};
use tracing::{debug, trace};

use crate::entity::{Entity, Node};
use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::primitive::Primitive;
use crate::scene::FlatScene;

/// Buffer lengths required to flatten a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSizes {
    /// Length of the `bytes` buffer
    pub bytes: usize,
    /// Length of the `offsets` and `types` buffers
    pub entities: usize,
    /// Length of the `steps` buffer
    pub steps: usize,
}

impl RenderSizes {
    /// Account for `entity` and check the result fits the evaluator
    pub fn of(entity: &Entity) -> Result<Self> {
        let mut sizes = Self::default();
        entity.accumulate_size(&mut sizes);

        if sizes.entities > MAX_ENTITY_COUNT {
            return Err(Error::CapacityExceeded {
                count: sizes.entities,
                max: MAX_ENTITY_COUNT,
            });
        }
        Ok(sizes)
    }
}

/// Output buffers and write cursors threaded through [`Entity::serialize`]
#[derive(Debug)]
pub struct FlattenContext<'a> {
    bytes: &'a mut [u8],
    offsets: &'a mut [u32],
    types: &'a mut [u8],
    steps: &'a mut [OpStep],
    entity_index: usize,
    byte_cursor: usize,
    step_index: usize,
}

impl<'a> FlattenContext<'a> {
    /// Wrap caller-allocated buffers, which must have exactly the lengths
    /// given by `sizes`.
    pub fn new(
        sizes: &RenderSizes,
        bytes: &'a mut [u8],
        offsets: &'a mut [u32],
        types: &'a mut [u8],
        steps: &'a mut [OpStep],
    ) -> Result<Self> {
        check_len("bytes", sizes.bytes, bytes.len())?;
        check_len("offsets", sizes.entities, offsets.len())?;
        check_len("types", sizes.entities, types.len())?;
        check_len("steps", sizes.steps, steps.len())?;

        Ok(Self {
            bytes,
            offsets,
            types,
            steps,
            entity_index: 0,
            byte_cursor: 0,
            step_index: 0,
        })
    }

    /// How much has been written so far
    pub fn written(&self) -> RenderSizes {
        RenderSizes {
            bytes: self.byte_cursor,
            entities: self.entity_index,
            steps: self.step_index,
        }
    }

    /// Check there is room left for `needed` more output at the cursors
    fn reserve(&self, needed: &RenderSizes) -> Result<()> {
        check_room("bytes", self.byte_cursor + needed.bytes, self.bytes.len())?;
        check_room("offsets", self.entity_index + needed.entities, self.offsets.len())?;
        check_room("types", self.entity_index + needed.entities, self.types.len())?;
        check_room("steps", self.step_index + needed.steps, self.steps.len())
    }

    fn push_leaf(&mut self, prim: &Primitive) -> Operand {
        let index = self.entity_index;
        let start = self.byte_cursor;
        let end = start + prim.footprint();

        self.types[index] = prim.entity_type().as_u8();
        self.offsets[index] = start as u32;
        prim.write_params(&mut self.bytes[start..end]);

        self.entity_index += 1;
        self.byte_cursor = end;
        Operand::Entity(index as u32)
    }

    fn push_step(&mut self, op: &Operation, left: Operand, right: Option<Operand>) -> Operand {
        let index = self.step_index;
        self.steps[index] = OpStep::new(op.op_type(), left, right, op.payload());
        trace!(step = index, op = %op.op_type(), %left, "emitted step");

        self.step_index += 1;
        Operand::Step(index as u32)
    }
}

fn check_room(buffer: &'static str, required: usize, actual: usize) -> Result<()> {
    if required <= actual {
        Ok(())
    } else {
        Err(Error::BufferSize {
            buffer,
            expected: required,
            actual,
        })
    }
}

fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::BufferSize {
            buffer,
            expected,
            actual,
        })
    }
}

impl Entity {
    /// Add this subtree's contribution to `sizes`. Leaves add their
    /// footprint and one entity; composites add their children and one step.
    pub fn accumulate_size(&self, sizes: &mut RenderSizes) {
        match self.node() {
            Node::Leaf(prim) => {
                sizes.bytes += prim.footprint();
                sizes.entities += 1;
            }
            Node::Composite(comp) => {
                for child in comp.children() {
                    child.accumulate_size(sizes);
                }
                sizes.steps += 1;
            }
        }
    }

    /// Required buffer lengths for this tree
    pub fn render_sizes(&self) -> Result<RenderSizes> {
        RenderSizes::of(self)
    }

    /// Write this subtree at the context's cursors and return the operand
    /// under which its result can be found.
    ///
    /// Fails with [`Error::BufferSize`] before writing anything if the
    /// context has too little room left for this subtree.
    pub fn serialize(&self, ctx: &mut FlattenContext<'_>) -> Result<Operand> {
        ctx.reserve(&self.render_sizes()?)?;
        Ok(self.write_post_order(ctx))
    }

    /// Infallible once the context has reserved room for the whole subtree
    fn write_post_order(&self, ctx: &mut FlattenContext<'_>) -> Operand {
        match self.node() {
            Node::Leaf(prim) => ctx.push_leaf(prim),
            Node::Composite(comp) => {
                let left = comp.left().write_post_order(ctx);
                let right = comp.right().map(|right| right.write_post_order(ctx));
                ctx.push_step(comp.op(), left, right)
            }
        }
    }

    /// Run both passes against caller-allocated buffers. Nothing is written
    /// unless every buffer has exactly the accounted length.
    pub fn serialize_into(
        &self,
        bytes: &mut [u8],
        offsets: &mut [u32],
        types: &mut [u8],
        steps: &mut [OpStep],
    ) -> Result<Operand> {
        let sizes = self.render_sizes()?;
        let mut ctx = FlattenContext::new(&sizes, bytes, offsets, types, steps)?;
        let root = self.write_post_order(&mut ctx);
        debug_assert_eq!(ctx.written(), sizes);
        Ok(root)
    }

    /// Flatten into freshly allocated buffers
    pub fn flatten(&self) -> Result<FlatScene> {
        let sizes = self.render_sizes()?;

        let mut bytes = vec![0u8; sizes.bytes];
        let mut offsets = vec![0u32; sizes.entities];
        let mut types = vec![0u8; sizes.entities];
        let mut steps = vec![OpStep::zeroed(); sizes.steps];

        let root = self.serialize_into(&mut bytes, &mut offsets, &mut types, &mut steps)?;

        debug!(
            bytes = sizes.bytes,
            entities = sizes.entities,
            steps = sizes.steps,
            %root,
            "flattened scene"
        );

        Ok(FlatScene::from_parts(bytes, offsets, types, steps, root))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::{make_combine, make_offset};
    use crate::operation::BooleanOp;
    use crate::primitive::{box3, cylinder, gyroid, sphere};
    use glam::Vec3;

    #[test]
    fn leaf_sizes() {
        let sizes = cylinder(Vec3::ZERO, Vec3::Y, 0.1).render_sizes().unwrap();
        assert_eq!(
            sizes,
            RenderSizes {
                bytes: 28,
                entities: 1,
                steps: 0
            }
        );
    }

    #[test]
    fn sizes_accumulate_across_calls() {
        let mut sizes = RenderSizes::default();
        gyroid(1.0, 0.1).accumulate_size(&mut sizes);
        sphere(Vec3::ZERO, 1.0).accumulate_size(&mut sizes);
        assert_eq!(sizes.bytes, 8 + 16);
        assert_eq!(sizes.entities, 2);
        assert_eq!(sizes.steps, 0);
    }

    #[test]
    fn undersized_buffer_is_rejected_before_writing() {
        let tree = make_combine(
            box3(Vec3::ZERO, Vec3::ONE),
            sphere(Vec3::ZERO, 0.5),
            BooleanOp::Union,
        )
        .unwrap();

        let mut bytes = vec![0xAAu8; 39];
        let mut offsets = vec![7u32; 2];
        let mut types = vec![9u8; 2];
        let mut steps = vec![OpStep::zeroed(); 1];

        let err = tree
            .serialize_into(&mut bytes, &mut offsets, &mut types, &mut steps)
            .unwrap_err();
        assert_eq!(
            err,
            Error::BufferSize {
                buffer: "bytes",
                expected: 40,
                actual: 39
            }
        );
        assert!(bytes.iter().all(|&b| b == 0xAA));
        assert_eq!(offsets, vec![7, 7]);
        assert_eq!(types, vec![9, 9]);
    }

    #[test]
    fn context_tracks_cursors() {
        let tree = make_offset(sphere(Vec3::ZERO, 1.0), 0.5).unwrap();
        let sizes = tree.render_sizes().unwrap();

        let mut bytes = vec![0u8; sizes.bytes];
        let mut offsets = vec![0u32; sizes.entities];
        let mut types = vec![0u8; sizes.entities];
        let mut steps = vec![OpStep::zeroed(); sizes.steps];
        let mut ctx =
            FlattenContext::new(&sizes, &mut bytes, &mut offsets, &mut types, &mut steps).unwrap();

        assert_eq!(ctx.written(), RenderSizes::default());
        let root = tree.serialize(&mut ctx).unwrap();
        assert_eq!(root, Operand::Step(0));
        assert_eq!(ctx.written(), sizes);
    }

    #[test]
    fn serializing_twice_gives_identical_buffers() {
        let tree = make_combine(
            make_offset(gyroid(2.0, 0.05), 0.1).unwrap(),
            box3(Vec3::splat(-1.0), Vec3::ONE),
            BooleanOp::Intersection.blended(0.2),
        )
        .unwrap();

        assert_eq!(tree.flatten().unwrap(), tree.flatten().unwrap());
    }

    #[test]
    fn context_sized_for_a_smaller_tree_is_rejected() {
        let small = sphere(Vec3::ZERO, 1.0);
        let sizes = small.render_sizes().unwrap();

        let mut bytes = vec![0u8; sizes.bytes];
        let mut offsets = vec![0u32; sizes.entities];
        let mut types = vec![0u8; sizes.entities];
        let mut steps = vec![OpStep::zeroed(); sizes.steps];
        let mut ctx =
            FlattenContext::new(&sizes, &mut bytes, &mut offsets, &mut types, &mut steps).unwrap();

        let bigger = make_combine(&small, gyroid(1.0, 0.1), BooleanOp::Union).unwrap();
        let err = bigger.serialize(&mut ctx).unwrap_err();
        assert_eq!(
            err,
            Error::BufferSize {
                buffer: "bytes",
                expected: 24,
                actual: 16
            }
        );
        assert_eq!(ctx.written(), RenderSizes::default());
    }

    #[test]
    fn second_serialize_into_a_full_context_is_rejected() {
        let tree = make_offset(gyroid(1.0, 0.1), 0.1).unwrap();
        let sizes = tree.render_sizes().unwrap();

        let mut bytes = vec![0u8; sizes.bytes];
        let mut offsets = vec![0u32; sizes.entities];
        let mut types = vec![0u8; sizes.entities];
        let mut steps = vec![OpStep::zeroed(); sizes.steps];
        let mut ctx =
            FlattenContext::new(&sizes, &mut bytes, &mut offsets, &mut types, &mut steps).unwrap();

        assert_eq!(tree.serialize(&mut ctx), Ok(Operand::Step(0)));
        assert!(matches!(
            tree.serialize(&mut ctx),
            Err(Error::BufferSize {
                buffer: "bytes",
                expected: 16,
                actual: 8
            })
        ));
        assert_eq!(ctx.written(), sizes);
    }
}
