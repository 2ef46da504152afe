//! Leaf primitives
//!
//! Each leaf is an immutable bag of parameters with a fixed byte footprint
//! in the `bytes` buffer. The constructor functions at the bottom of this
//! module return [`Entity`] handles directly, ready to be combined.

use glam::Vec3;
use implicit_wire::{
    BoxParams, CylinderParams, EntityType, HalfspaceParams, PeriodicParams, SphereParams,
};

use crate::Entity;

/// A leaf primitive and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Axis-aligned box between two corners
    Box { min: Vec3, max: Vec3 },
    /// Sphere around `center`
    Sphere { center: Vec3, radius: f32 },
    /// Capped cylinder whose axis runs from `point1` to `point2`
    Cylinder { point1: Vec3, point2: Vec3, radius: f32 },
    /// Gyroid sheet of the given cell frequency and width
    Gyroid { scale: f32, thickness: f32 },
    /// Schwarz P sheet of the given cell frequency and width
    Schwarz { scale: f32, thickness: f32 },
    /// Half-space bounded by the plane through `origin` with `normal`
    Halfspace { origin: Vec3, normal: Vec3 },
}

impl Primitive {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Box { .. } => EntityType::Box,
            Self::Sphere { .. } => EntityType::Sphere,
            Self::Cylinder { .. } => EntityType::Cylinder,
            Self::Gyroid { .. } => EntityType::Gyroid,
            Self::Schwarz { .. } => EntityType::Schwarz,
            Self::Halfspace { .. } => EntityType::Halfspace,
        }
    }

    /// Bytes this leaf occupies in the `bytes` buffer
    pub fn footprint(&self) -> usize {
        self.entity_type().footprint()
    }

    /// Copy the packed parameters into `dst`, which must be exactly
    /// [`footprint`](Self::footprint) bytes long.
    pub(crate) fn write_params(&self, dst: &mut [u8]) {
        match *self {
            Self::Box { min, max } => dst.copy_from_slice(bytemuck::bytes_of(&BoxParams {
                min: min.to_array(),
                max: max.to_array(),
            })),
            Self::Sphere { center, radius } => {
                dst.copy_from_slice(bytemuck::bytes_of(&SphereParams {
                    center: center.to_array(),
                    radius,
                }));
            }
            Self::Cylinder {
                point1,
                point2,
                radius,
            } => dst.copy_from_slice(bytemuck::bytes_of(&CylinderParams {
                point1: point1.to_array(),
                point2: point2.to_array(),
                radius,
            })),
            Self::Gyroid { scale, thickness } | Self::Schwarz { scale, thickness } => {
                dst.copy_from_slice(bytemuck::bytes_of(&PeriodicParams { scale, thickness }));
            }
            Self::Halfspace { origin, normal } => {
                dst.copy_from_slice(bytemuck::bytes_of(&HalfspaceParams {
                    origin: origin.to_array(),
                    normal: normal.to_array(),
                }));
            }
        }
    }
}

// ============================================================================
// Leaf constructors
// ============================================================================

/// Axis-aligned box spanning `min` to `max`
pub fn box3(min: Vec3, max: Vec3) -> Entity {
    Primitive::Box { min, max }.into()
}

/// Sphere of `radius` around `center`
pub fn sphere(center: Vec3, radius: f32) -> Entity {
    Primitive::Sphere { center, radius }.into()
}

/// Capped cylinder whose axis runs from `point1` to `point2`
pub fn cylinder(point1: Vec3, point2: Vec3, radius: f32) -> Entity {
    Primitive::Cylinder {
        point1,
        point2,
        radius,
    }
    .into()
}

/// Gyroid sheet, `scale` is the cell frequency and `thickness` the sheet width
pub fn gyroid(scale: f32, thickness: f32) -> Entity {
    Primitive::Gyroid { scale, thickness }.into()
}

/// Schwarz P sheet, parameters as for [`gyroid`]
pub fn schwarz(scale: f32, thickness: f32) -> Entity {
    Primitive::Schwarz { scale, thickness }.into()
}

/// Half-space through `origin`. The normal is stored as given, not normalized.
pub fn halfspace(origin: Vec3, normal: Vec3) -> Entity {
    Primitive::Halfspace { origin, normal }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(prim: &Primitive) -> Vec<f32> {
        let mut bytes = vec![0u8; prim.footprint()];
        prim.write_params(&mut bytes);
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn box_writes_min_then_max() {
        let prim = Primitive::Box {
            min: Vec3::new(-1.0, -2.0, -3.0),
            max: Vec3::new(1.0, 2.0, 3.0),
        };
        assert_eq!(packed(&prim), vec![-1.0, -2.0, -3.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn cylinder_writes_endpoints_then_radius() {
        let prim = Primitive::Cylinder {
            point1: Vec3::ZERO,
            point2: Vec3::Y,
            radius: 0.25,
        };
        assert_eq!(packed(&prim), vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.25]);
    }

    #[test]
    fn periodic_surfaces_share_layout_but_not_tag() {
        let g = Primitive::Gyroid {
            scale: 4.0,
            thickness: 0.1,
        };
        let s = Primitive::Schwarz {
            scale: 4.0,
            thickness: 0.1,
        };
        assert_eq!(packed(&g), packed(&s));
        assert_ne!(g.entity_type(), s.entity_type());
    }

    #[test]
    fn halfspace_normal_is_kept_verbatim() {
        let prim = Primitive::Halfspace {
            origin: Vec3::ZERO,
            normal: Vec3::new(0.0, 2.0, 0.0),
        };
        assert_eq!(packed(&prim), vec![0.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn constructors_produce_leaves() {
        for (entity, ty) in [
            (box3(Vec3::ZERO, Vec3::ONE), EntityType::Box),
            (sphere(Vec3::ZERO, 1.0), EntityType::Sphere),
            (cylinder(Vec3::ZERO, Vec3::X, 0.5), EntityType::Cylinder),
            (gyroid(1.0, 0.1), EntityType::Gyroid),
            (schwarz(1.0, 0.1), EntityType::Schwarz),
            (halfspace(Vec3::ZERO, Vec3::Y), EntityType::Halfspace),
        ] {
            assert!(entity.is_leaf());
            assert_eq!(entity.entity_type(), ty);
            assert_eq!(entity.leaf_count(), 1);
        }
    }
}
