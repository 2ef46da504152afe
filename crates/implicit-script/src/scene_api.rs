//! Rhai API for scene primitives and operations
//!
//! This module provides all scene-building functions accessible from Rhai
//! scripts. Builder errors (arity, leaf capacity) become script runtime
//! errors at the call that caused them.

use glam::Vec3;
use implicit_scene::{
    BooleanOp, Entity, box3, cylinder, gyroid, halfspace, make_combine, make_linear_blend,
    make_offset, make_smooth_blend, schwarz, sphere,
};
use rhai::{Engine, EvalAltResult};

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

/// Scene entity as seen by Rhai. Cloning shares the underlying subtree.
#[derive(Debug, Clone)]
pub struct ScriptEntity {
    pub entity: Entity,
}

/// 3-component vector as seen by Rhai
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptVec3(pub Vec3);

fn built(result: implicit_scene::Result<Entity>) -> ScriptResult<ScriptEntity> {
    result
        .map(ScriptEntity::new)
        .map_err(|e| e.to_string().into())
}

impl ScriptEntity {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    // === Boolean Operations ===

    pub fn union(&mut self, other: ScriptEntity) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Union, 0.0)
    }

    pub fn intersect(&mut self, other: ScriptEntity) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Intersection, 0.0)
    }

    pub fn subtract(&mut self, other: ScriptEntity) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Subtraction, 0.0)
    }

    pub fn blend_union(&mut self, other: ScriptEntity, radius: f64) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Union, radius)
    }

    pub fn blend_intersect(
        &mut self,
        other: ScriptEntity,
        radius: f64,
    ) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Intersection, radius)
    }

    pub fn blend_subtract(
        &mut self,
        other: ScriptEntity,
        radius: f64,
    ) -> ScriptResult<ScriptEntity> {
        self.combine(other, BooleanOp::Subtraction, radius)
    }

    fn combine(
        &mut self,
        other: ScriptEntity,
        op: BooleanOp,
        radius: f64,
    ) -> ScriptResult<ScriptEntity> {
        built(make_combine(
            &self.entity,
            other.entity,
            op.blended(radius as f32),
        ))
    }

    // === Offset and Blends ===

    pub fn offset(&mut self, distance: f64) -> ScriptResult<ScriptEntity> {
        built(make_offset(&self.entity, distance as f32))
    }

    pub fn linear_blend(
        &mut self,
        other: ScriptEntity,
        p1: ScriptVec3,
        p2: ScriptVec3,
    ) -> ScriptResult<ScriptEntity> {
        built(make_linear_blend(&self.entity, other.entity, p1.0, p2.0))
    }

    pub fn smooth_blend(
        &mut self,
        other: ScriptEntity,
        p1: ScriptVec3,
        p2: ScriptVec3,
    ) -> ScriptResult<ScriptEntity> {
        built(make_smooth_blend(&self.entity, other.entity, p1.0, p2.0))
    }

    // === Queries ===

    pub fn leaf_count(&mut self) -> i64 {
        self.entity.leaf_count() as i64
    }

    pub fn is_leaf(&mut self) -> bool {
        self.entity.is_leaf()
    }
}

// === Constructors ===

pub fn vec3(x: f64, y: f64, z: f64) -> ScriptVec3 {
    ScriptVec3(Vec3::new(x as f32, y as f32, z as f32))
}

pub fn script_box3(min: ScriptVec3, max: ScriptVec3) -> ScriptEntity {
    ScriptEntity::new(box3(min.0, max.0))
}

pub fn script_sphere(center: ScriptVec3, radius: f64) -> ScriptEntity {
    ScriptEntity::new(sphere(center.0, radius as f32))
}

pub fn script_cylinder(point1: ScriptVec3, point2: ScriptVec3, radius: f64) -> ScriptEntity {
    ScriptEntity::new(cylinder(point1.0, point2.0, radius as f32))
}

pub fn script_gyroid(scale: f64, thickness: f64) -> ScriptEntity {
    ScriptEntity::new(gyroid(scale as f32, thickness as f32))
}

pub fn script_schwarz(scale: f64, thickness: f64) -> ScriptEntity {
    ScriptEntity::new(schwarz(scale as f32, thickness as f32))
}

pub fn script_halfspace(origin: ScriptVec3, normal: ScriptVec3) -> ScriptEntity {
    ScriptEntity::new(halfspace(origin.0, normal.0))
}

/// Register all scene functions with a Rhai engine
pub fn register_scene_api(engine: &mut Engine) {
    engine
        .register_type_with_name::<ScriptEntity>("Entity")
        .register_fn("to_string", |e: &mut ScriptEntity| {
            format!("{:?}", e.entity.entity_type())
        });

    engine
        .register_type_with_name::<ScriptVec3>("Vec3")
        .register_fn("vec3", vec3)
        .register_get("x", |v: &mut ScriptVec3| f64::from(v.0.x))
        .register_get("y", |v: &mut ScriptVec3| f64::from(v.0.y))
        .register_get("z", |v: &mut ScriptVec3| f64::from(v.0.z))
        .register_fn("to_string", |v: &mut ScriptVec3| {
            format!("({}, {}, {})", v.0.x, v.0.y, v.0.z)
        });

    // === Primitive constructors ===
    engine.register_fn("box3", script_box3);
    engine.register_fn("sphere", script_sphere);
    engine.register_fn("cylinder", script_cylinder);
    engine.register_fn("gyroid", script_gyroid);
    engine.register_fn("schwarz", script_schwarz);
    engine.register_fn("halfspace", script_halfspace);

    // === Boolean operations ===
    engine.register_fn("union", ScriptEntity::union);
    engine.register_fn("intersect", ScriptEntity::intersect);
    engine.register_fn("subtract", ScriptEntity::subtract);
    engine.register_fn("union", ScriptEntity::blend_union);
    engine.register_fn("intersect", ScriptEntity::blend_intersect);
    engine.register_fn("subtract", ScriptEntity::blend_subtract);

    // === Offset and blends ===
    engine.register_fn("offset", ScriptEntity::offset);
    engine.register_fn("linear_blend", ScriptEntity::linear_blend);
    engine.register_fn("smooth_blend", ScriptEntity::smooth_blend);

    // === Queries ===
    engine.register_fn("leaf_count", ScriptEntity::leaf_count);
    engine.register_fn("is_leaf", ScriptEntity::is_leaf);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use implicit_scene::EntityType;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        register_scene_api(&mut engine);
        engine
    }

    #[test]
    fn vec3_components_are_readable() {
        let x: f64 = engine().eval("let v = vec3(1.5, 2.0, 3.0); v.x").unwrap();
        assert!((x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn union_without_radius_is_sharp() {
        let result: ScriptEntity = engine()
            .eval("sphere(vec3(0.0, 0.0, 0.0), 1.0).union(gyroid(2.0, 0.1))")
            .unwrap();
        let scene = result.entity.flatten().unwrap();
        assert_eq!(scene.steps()[0].data[0].to_bits(), 0);
    }

    #[test]
    fn union_with_radius_carries_it() {
        let result: ScriptEntity = engine()
            .eval("sphere(vec3(0.0, 0.0, 0.0), 1.0).union(gyroid(2.0, 0.1), 0.25)")
            .unwrap();
        let scene = result.entity.flatten().unwrap();
        assert!((scene.steps()[0].data[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn leaf_constructors_have_expected_tags() {
        let engine = engine();
        for (script, ty) in [
            ("box3(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0))", EntityType::Box),
            ("sphere(vec3(0.0, 0.0, 0.0), 1.0)", EntityType::Sphere),
            ("cylinder(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), 0.5)", EntityType::Cylinder),
            ("gyroid(1.0, 0.1)", EntityType::Gyroid),
            ("schwarz(1.0, 0.1)", EntityType::Schwarz),
            ("halfspace(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0))", EntityType::Halfspace),
        ] {
            let result: ScriptEntity = engine.eval(script).unwrap();
            assert_eq!(result.entity.entity_type(), ty, "{script}");
        }
    }

    #[test]
    fn capacity_error_surfaces_in_script() {
        let script = r#"
            let scene = sphere(vec3(0.0, 0.0, 0.0), 1.0);
            for i in 0..40 {
                scene = scene.union(gyroid(1.0, 0.1));
            }
            scene
        "#;
        let err = engine().eval::<ScriptEntity>(script).unwrap_err();
        assert!(err.to_string().contains("at most 32"), "{err}");
    }
}
