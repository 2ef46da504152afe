//! Implicit CLI - inspect how scenes flatten into evaluator buffers

mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use implicit_scene::{
    BooleanOp, Entity, FlatScene, box3, cylinder, gyroid, halfspace, make_combine,
    make_linear_blend, make_offset, sphere,
};
use implicit_script::ScriptEngine;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::report::ProgramReport;

#[derive(Parser)]
#[command(name = "implicit")]
#[command(
    about = "Flatten CSG scenes of implicit primitives for a raymarching evaluator",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a script and print its flattened program
    Inspect {
        /// Script file to inspect
        script: PathBuf,

        /// Print a JSON report instead of the listing
        #[arg(long)]
        json: bool,
    },

    /// Evaluate, flatten and validate scripts, reporting failures
    Check {
        /// Script files to check
        #[arg(required = true)]
        scripts: Vec<PathBuf>,
    },

    /// Print the WGSL declarations of the wire contract
    Wgsl,

    /// Flatten the built-in demo scene
    Demo {
        /// Print a JSON report instead of the listing
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect { script, json } => {
            run_inspect(&script, json)?;
        }
        Commands::Check { scripts } => {
            run_check(&scripts)?;
        }
        Commands::Wgsl => {
            print!("{}", implicit_wire::wgsl_declarations());
        }
        Commands::Demo { json } => {
            let scene = create_demo_scene()?.flatten()?;
            print_scene(&scene, json)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for listings and JSON
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_inspect(script: &Path, json: bool) -> Result<()> {
    let engine = ScriptEngine::new();
    let entity = engine.eval_entity_file(script)?;
    let scene = entity
        .flatten()
        .with_context(|| format!("Failed to flatten {}", script.display()))?;

    info!(
        script = %script.display(),
        entities = scene.entity_count(),
        steps = scene.steps().len(),
        "flattened script"
    );
    print_scene(&scene, json)
}

fn run_check(scripts: &[PathBuf]) -> Result<()> {
    let engine = ScriptEngine::new();
    let mut failures = 0;

    for path in scripts {
        let outcome = engine
            .eval_entity_file(path)
            .and_then(|entity| {
                let scene = entity.flatten()?;
                scene.validate()?;
                Ok(scene)
            });

        match outcome {
            Ok(scene) => {
                let sizes = scene.sizes();
                println!(
                    "ok    {} ({} entities, {} steps, {} bytes)",
                    path.display(),
                    sizes.entities,
                    sizes.steps,
                    sizes.bytes
                );
            }
            Err(e) => {
                warn!(script = %path.display(), "check failed");
                println!("FAIL  {}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} scripts failed", failures, scripts.len());
    }
    Ok(())
}

fn print_scene(scene: &FlatScene, json: bool) -> Result<()> {
    if json {
        let report = ProgramReport::new(scene);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{scene}");
    }
    Ok(())
}

/// A small scene touching every operation kind
fn create_demo_scene() -> Result<Entity> {
    let post = cylinder(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.3);
    let cap = sphere(Vec3::new(0.0, 1.0, 0.0), 0.45);
    let pillar = make_combine(&post, &cap, BooleanOp::Union.blended(0.1))?;

    let block = box3(Vec3::splat(-1.0), Vec3::splat(1.0));
    let lattice = make_combine(block, gyroid(6.0, 0.05), BooleanOp::Intersection)?;

    let ground = halfspace(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
    let base = make_combine(ground, make_offset(&lattice, 0.02)?, BooleanOp::Subtraction)?;

    Ok(make_linear_blend(
        base,
        pillar,
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    )?)
}
