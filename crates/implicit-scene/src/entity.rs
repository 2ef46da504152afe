//! Entity tree
//!
//! An [`Entity`] is a cheap, shareable handle to an immutable node. Cloning
//! an entity is an `Arc` reference count increment, so the same subtree can
//! be held by several composites; it is released when the last holder drops.
//!
//! Composites are built through the `make_*` helpers (or
//! [`Entity::composite`]), which validate arity and the leaf capacity before
//! a node exists. A tree that was built is always valid to flatten.

use std::sync::Arc;

use glam::Vec3;
use implicit_wire::{EntityType, MAX_ENTITY_COUNT};

use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::primitive::Primitive;

/// Handle to a leaf or composite node
#[derive(Debug, Clone)]
pub struct Entity(Arc<Node>);

/// The closed set of entity variants
#[derive(Debug)]
pub enum Node {
    Leaf(Primitive),
    Composite(Composite),
}

/// An operation applied to one or two children
#[derive(Debug)]
pub struct Composite {
    left: Entity,
    right: Option<Entity>,
    op: Operation,
    leaf_count: usize,
}

impl Composite {
    pub fn left(&self) -> &Entity {
        &self.left
    }

    /// `None` exactly when the operation is unary
    pub fn right(&self) -> Option<&Entity> {
        self.right.as_ref()
    }

    pub fn op(&self) -> &Operation {
        &self.op
    }

    /// Children in serialization order
    pub fn children(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.left).chain(self.right.as_ref())
    }
}

impl Entity {
    /// Build a composite, checking the child count against the operation's
    /// arity and the combined leaf count against [`MAX_ENTITY_COUNT`].
    pub fn composite(
        op: impl Into<Operation>,
        left: impl Into<Entity>,
        right: Option<Entity>,
    ) -> Result<Entity> {
        let op = op.into();
        let left = left.into();

        let found = 1 + usize::from(right.is_some());
        if found != op.arity() {
            return Err(Error::Arity {
                op: op.op_type(),
                expected: op.arity(),
                found,
            });
        }

        let leaf_count = left.leaf_count() + right.as_ref().map_or(0, Entity::leaf_count);
        if leaf_count > MAX_ENTITY_COUNT {
            return Err(Error::CapacityExceeded {
                count: leaf_count,
                max: MAX_ENTITY_COUNT,
            });
        }

        Ok(Entity(Arc::new(Node::Composite(Composite {
            left,
            right,
            op,
            leaf_count,
        }))))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn entity_type(&self) -> EntityType {
        match self.node() {
            Node::Leaf(prim) => prim.entity_type(),
            Node::Composite(_) => EntityType::Csg,
        }
    }

    /// Raw tag byte, as written to the `types` buffer for leaves
    pub fn type_tag(&self) -> u8 {
        self.entity_type().as_u8()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node(), Node::Leaf(_))
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self.node() {
            Node::Leaf(prim) => Some(prim),
            Node::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self.node() {
            Node::Leaf(_) => None,
            Node::Composite(comp) => Some(comp),
        }
    }

    /// Leaf occurrences reachable from this entity, counting a shared
    /// subtree once per place it is reached
    pub fn leaf_count(&self) -> usize {
        match self.node() {
            Node::Leaf(_) => 1,
            Node::Composite(comp) => comp.leaf_count,
        }
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles currently holding this node
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<Primitive> for Entity {
    fn from(prim: Primitive) -> Self {
        Entity(Arc::new(Node::Leaf(prim)))
    }
}

impl From<&Entity> for Entity {
    fn from(entity: &Entity) -> Self {
        entity.clone()
    }
}

// ============================================================================
// Tree construction helpers
// ============================================================================

/// Binary composite. `op` is usually a [`BooleanOp`](crate::BooleanOp)
/// (sharp) or `BooleanOp::blended(r)`.
pub fn make_combine(
    left: impl Into<Entity>,
    right: impl Into<Entity>,
    op: impl Into<Operation>,
) -> Result<Entity> {
    Entity::composite(op, left, Some(right.into()))
}

/// Unary composite offsetting the child's surface by `distance`
pub fn make_offset(child: impl Into<Entity>, distance: f32) -> Result<Entity> {
    Entity::composite(Operation::Offset { distance }, child, None)
}

pub fn make_linear_blend(
    left: impl Into<Entity>,
    right: impl Into<Entity>,
    p1: Vec3,
    p2: Vec3,
) -> Result<Entity> {
    Entity::composite(Operation::LinearBlend { p1, p2 }, left, Some(right.into()))
}

pub fn make_smooth_blend(
    left: impl Into<Entity>,
    right: impl Into<Entity>,
    p1: Vec3,
    p2: Vec3,
) -> Result<Entity> {
    Entity::composite(Operation::SmoothBlend { p1, p2 }, left, Some(right.into()))
}
