// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OpenSCAD engine

use super::{command_for, run, Exchange};
use crate::boolean::{BooleanEngine, Engine, Operation};
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;
use anyhow::Context;
use std::path::PathBuf;
use std::process::Command;

/// Message OpenSCAD prints when the result encloses nothing
const EMPTY_RESULT: &str = "top level object is empty";

/// Runs `openscad` on a generated script that imports every operand
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenScadEngine;

impl OpenScadEngine {
    fn run(&self, op: Operation, operands: &[&Mesh]) -> anyhow::Result<Mesh> {
        let program = command_for(Engine::OpenScad).unwrap_or("openscad");
        let exchange = Exchange::new(operands)?;

        let script = exchange.path("boolean.scad");
        std::fs::write(&script, script_source(op, exchange.inputs()))
            .context("Failed to write OpenSCAD script")?;

        let mut command = Command::new(program);
        command
            .arg("-o")
            .arg(exchange.output())
            .arg(&script)
            .arg("--quiet");

        match run(&mut command, program) {
            Ok(_) => exchange.read_output(),
            Err(error) if format!("{error:#}").contains(EMPTY_RESULT) => Ok(Mesh::empty()),
            Err(error) => Err(error),
        }
    }
}

impl BooleanEngine for OpenScadEngine {
    fn engine(&self) -> Engine {
        Engine::OpenScad
    }

    fn supports_nary(&self, _op: Operation) -> bool {
        true
    }

    fn compute(&self, op: Operation, operands: &[&Mesh]) -> Result<Mesh> {
        self.check_operands(op, operands)?;
        if let [mesh] = operands {
            return Ok(Mesh::clone(mesh));
        }
        self.run(op, operands)
            .map_err(|error| BooleanError::computation(Engine::OpenScad, op, error))
    }
}

/// OpenSCAD source applying `op` to the imported files
fn script_source(op: Operation, inputs: &[PathBuf]) -> String {
    let mut source = format!("{}() {{\n", op_keyword(op));
    for input in inputs {
        // backslashes are escapes inside OpenSCAD strings
        let path = input.display().to_string().replace('\\', "/");
        source.push_str(&format!("    import(\"{path}\");\n"));
    }
    source.push_str("}\n");
    source
}

fn op_keyword(op: Operation) -> &'static str {
    match op {
        Operation::Union => "union",
        Operation::Intersection => "intersection",
        Operation::Difference => "difference",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_source() {
        let inputs = vec![PathBuf::from("/tmp/a.stl"), PathBuf::from("/tmp/b.stl")];
        assert_eq!(
            script_source(Operation::Difference, &inputs),
            "difference() {\n    import(\"/tmp/a.stl\");\n    import(\"/tmp/b.stl\");\n}\n"
        );
    }
}
