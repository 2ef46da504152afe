//! WGSL declarations of the wire contract
//!
//! The evaluator includes this block so that tag values, the operand
//! encoding and the `OpStep` layout are read from the same definitions the
//! host writes with.

// String writing is infallible, so .unwrap() is safe here
#![allow(clippy::unwrap_used)]

use std::fmt::Write;

use crate::layout::{OP_DATA_LEN, Operand};
use crate::tags::{EntityType, OpType};
use crate::MAX_ENTITY_COUNT;

/// Generate the WGSL constants, `OpStep` struct and operand helpers
pub fn wgsl_declarations() -> String {
    let mut code = String::new();

    writeln!(code, "// Generated by implicit-wire. Do not edit.").unwrap();
    writeln!(code, "const MAX_ENTITY_COUNT: u32 = {}u;", MAX_ENTITY_COUNT).unwrap();
    writeln!(code).unwrap();

    for ty in EntityType::LEAVES.iter().copied().chain([EntityType::Csg]) {
        writeln!(
            code,
            "const ENT_TYPE_{}: u32 = {}u;",
            ty.name().to_uppercase(),
            ty.as_u8()
        )
        .unwrap();
    }
    writeln!(code).unwrap();

    for op in [OpType::None].into_iter().chain(OpType::ALL) {
        writeln!(
            code,
            "const OP_{}: u32 = {}u;",
            op.name().to_uppercase(),
            op.as_u32()
        )
        .unwrap();
    }
    writeln!(code).unwrap();

    writeln!(code, "const OPERAND_NONE: u32 = 0x{:08x}u;", Operand::NONE).unwrap();
    writeln!(code, "const OPERAND_STEP_FLAG: u32 = 0x{:08x}u;", Operand::STEP_FLAG).unwrap();
    writeln!(code).unwrap();

    writeln!(code, "struct OpStep {{").unwrap();
    writeln!(code, "    op_type: u32,").unwrap();
    writeln!(code, "    left: u32,").unwrap();
    writeln!(code, "    right: u32,").unwrap();
    writeln!(code, "    data: array<f32, {}>,", OP_DATA_LEN).unwrap();
    writeln!(code, "}}").unwrap();
    writeln!(code).unwrap();

    writeln!(code, "fn operand_is_step(operand: u32) -> bool {{").unwrap();
    writeln!(
        code,
        "    return operand != OPERAND_NONE && (operand & OPERAND_STEP_FLAG) != 0u;"
    )
    .unwrap();
    writeln!(code, "}}").unwrap();
    writeln!(code).unwrap();

    writeln!(code, "fn operand_index(operand: u32) -> u32 {{").unwrap();
    writeln!(code, "    return operand & ~OPERAND_STEP_FLAG;").unwrap();
    writeln!(code, "}}").unwrap();

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_every_tag() {
        let code = wgsl_declarations();
        assert!(code.contains("const ENT_TYPE_BOX: u32 = 1u;"));
        assert!(code.contains("const ENT_TYPE_HALFSPACE: u32 = 6u;"));
        assert!(code.contains("const ENT_TYPE_CSG: u32 = 0u;"));
        assert!(code.contains("const OP_OFFSET: u32 = 4u;"));
        assert!(code.contains("const OP_SMOOTHBLEND: u32 = 6u;"));
        assert!(code.contains("const MAX_ENTITY_COUNT: u32 = 32u;"));
    }

    #[test]
    fn step_struct_matches_host_payload() {
        let code = wgsl_declarations();
        assert!(code.contains("struct OpStep {"));
        assert!(code.contains("data: array<f32, 6>,"));
        assert!(code.contains("const OPERAND_NONE: u32 = 0xffffffffu;"));
    }
}
