//! Script engine for evaluating Rhai scripts that produce scene trees

use crate::scene_api::{ScriptEntity, register_scene_api};
use anyhow::{Result, anyhow};
use implicit_scene::{Entity, FlatScene};
use rhai::{Dynamic, Engine};
use std::path::Path;
use tracing::debug;

/// Script engine with every scene function registered
pub struct ScriptEngine {
    engine: Engine,
}

impl ScriptEngine {
    /// Default limit on expression nesting inside scripts
    pub const DEFAULT_MAX_EXPR_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self::with_max_expr_depth(Self::DEFAULT_MAX_EXPR_DEPTH)
    }

    pub fn with_max_expr_depth(depth: usize) -> Self {
        let mut engine = Engine::new();

        register_scene_api(&mut engine);

        // Configure engine for better errors
        engine.set_max_expr_depths(depth, depth);

        Self { engine }
    }

    /// Evaluate a script and return the scene it ends with
    ///
    /// # Example
    ///
    /// ```ignore
    /// let engine = ScriptEngine::new();
    /// let scene = engine.eval_entity("gyroid(2.0, 0.1).offset(0.05)")?;
    /// ```
    pub fn eval_entity(&self, script: &str) -> Result<Entity> {
        let result: Dynamic = self
            .engine
            .eval(script)
            .map_err(|e| anyhow!("Failed to evaluate script: {}", e))?;

        let entity = result
            .try_cast::<ScriptEntity>()
            .map(ScriptEntity::into_entity)
            .ok_or_else(|| {
                if script.trim().ends_with(';') {
                    anyhow!(
                        "Script did not return an entity.\n\n\
                        HINT: Your script ends with ';' which returns nothing.\n\
                        Add the variable name at the end:\n\n\
                          let scene = sphere(vec3(0.0, 0.0, 0.0), 0.5);\n\
                          scene  // <- return it!"
                    )
                } else {
                    anyhow!("Script did not return an entity. The last expression must be a shape.")
                }
            })?;

        debug!(
            leaves = entity.leaf_count(),
            root = %entity.entity_type(),
            "evaluated scene script"
        );
        Ok(entity)
    }

    /// Evaluate a script file and return the scene it ends with
    pub fn eval_entity_file(&self, path: &Path) -> Result<Entity> {
        let script = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read script file {}: {}", path.display(), e))?;

        self.eval_entity(&script)
            .map_err(|e| anyhow!("Error in script {}: {}", path.display(), e))
    }

    /// Evaluate a script and flatten the result into evaluator buffers
    pub fn flatten_script(&self, script: &str) -> Result<FlatScene> {
        let entity = self.eval_entity(script)?;
        Ok(entity.flatten()?)
    }

    /// Compile a script to check for syntax errors without running it
    pub fn compile(&self, script: &str) -> Result<()> {
        self.engine
            .compile(script)
            .map_err(|e| anyhow!("Script compilation failed: {}", e))?;
        Ok(())
    }

    /// Get a reference to the underlying Rhai engine
    pub fn inner(&self) -> &Engine {
        &self.engine
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}
