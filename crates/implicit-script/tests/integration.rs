//! Integration tests for script to flat buffer pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use implicit_scene::{EntityType, OpType, Operand};
use implicit_script::ScriptEngine;
use std::path::{Path, PathBuf};

fn scripts_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent()
        .expect("Should have parent")
        .parent()
        .expect("Should have grandparent")
        .join("scripts")
}

#[test]
fn script_to_buffers_pipeline() {
    let script = r#"
        let solid = box3(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0));
        solid.union(sphere(vec3(0.0, 0.0, 0.0), 0.5))
    "#;

    let engine = ScriptEngine::new();
    let scene = engine.flatten_script(script).expect("Script should flatten");

    assert_eq!(scene.offsets(), &[0, 24]);
    assert_eq!(
        scene.types(),
        &[EntityType::Box.as_u8(), EntityType::Sphere.as_u8()]
    );
    assert_eq!(scene.bytes().len(), 40);
    assert_eq!(scene.steps()[0].op(), Some(OpType::Union));
}

#[test]
fn all_scripts_parse() {
    let engine = ScriptEngine::new();
    let dir = scripts_dir();

    if !dir.exists() {
        eprintln!("Scripts directory not found at {:?}, skipping test", dir);
        return;
    }

    let mut count = 0;
    for entry in std::fs::read_dir(&dir).expect("Should read scripts dir") {
        let path = entry.expect("Should read entry").path();
        if path.extension().is_some_and(|e| e == "rhai") {
            let entity = engine
                .eval_entity_file(&path)
                .unwrap_or_else(|e| panic!("Script {} should evaluate: {}", path.display(), e));
            let scene = entity
                .flatten()
                .unwrap_or_else(|e| panic!("Script {} should flatten: {}", path.display(), e));
            scene
                .validate()
                .unwrap_or_else(|e| panic!("Script {} is malformed: {}", path.display(), e));
            count += 1;
        }
    }

    assert!(count > 0, "Should have found at least one script file");
}

#[test]
fn reused_variable_is_serialized_twice() {
    let script = scripts_dir().join("shared_pillars.rhai");
    if !script.exists() {
        return;
    }

    let engine = ScriptEngine::new();
    let scene = engine
        .eval_entity_file(&script)
        .expect("Script should evaluate")
        .flatten()
        .expect("Scene should flatten");

    assert_eq!(scene.entity_count(), 6);
    assert_eq!(scene.steps().len(), 6);
    assert_eq!(scene.bytes().len(), 24 + 8 + 2 * (28 + 16));
    assert_eq!(scene.root(), Operand::Step(5));
}

#[test]
fn offset_script_emits_unary_step() {
    let engine = ScriptEngine::new();
    let scene = engine
        .flatten_script("cylinder(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), 0.3).offset(0.2)")
        .expect("Script should flatten");

    let step = scene.steps()[0];
    assert_eq!(step.op(), Some(OpType::Offset));
    assert_eq!(step.right_operand(), None);
    assert!((step.data[0] - 0.2).abs() < 1e-6);
}

#[test]
fn builder_errors_surface_from_scripts() {
    let script = r#"
        let s = gyroid(1.0, 0.1);
        for i in 0..6 {
            s = s.union(s);
        }
        s
    "#;

    let engine = ScriptEngine::new();
    let err = engine.eval_entity(script).unwrap_err().to_string();
    assert!(err.contains("at most 32"), "{err}");
}
