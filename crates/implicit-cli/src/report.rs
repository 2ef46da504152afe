//! Machine-readable program report for `--json`

use implicit_scene::FlatScene;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProgramReport {
    pub bytes: usize,
    pub entities: usize,
    pub steps: usize,
    pub root: String,
    pub leaves: Vec<LeafReport>,
    pub program: Vec<StepReport>,
}

#[derive(Debug, Serialize)]
pub struct LeafReport {
    pub index: usize,
    pub kind: String,
    pub offset: u32,
    pub params: Vec<f32>,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub op: String,
    pub operands: Vec<String>,
    pub data: Vec<f32>,
}

impl ProgramReport {
    pub fn new(scene: &FlatScene) -> Self {
        let sizes = scene.sizes();

        let leaves = (0..scene.entity_count())
            .map(|index| LeafReport {
                index,
                kind: scene
                    .leaf_type(index)
                    .map_or_else(|| "unknown".to_string(), |ty| ty.to_string()),
                offset: scene.offsets()[index],
                params: scene
                    .leaf_params(index)
                    .unwrap_or_default()
                    .chunks_exact(4)
                    .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            })
            .collect();

        let program = scene
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepReport {
                index,
                op: step
                    .op()
                    .map_or_else(|| "unknown".to_string(), |op| op.to_string()),
                operands: step.operands().map(|o| o.to_string()).collect(),
                data: step.data.to_vec(),
            })
            .collect();

        Self {
            bytes: sizes.bytes,
            entities: sizes.entities,
            steps: sizes.steps,
            root: scene.root().to_string(),
            leaves,
            program,
        }
    }
}
