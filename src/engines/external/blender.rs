// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Blender engine
//!
//! Blender runs headless with a generated Python script that imports the
//! operand STL files, applies boolean modifiers with the exact solver and
//! exports the first object.

use super::{command_for, run, Exchange};
use crate::boolean::{BooleanEngine, Engine, Operation};
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;
use anyhow::Context;
use std::process::Command;

const SCRIPT: &str = r#"
import sys
import bpy

args = sys.argv[sys.argv.index("--") + 1:]
operation, output, inputs = args[0], args[1], args[2:]

bpy.ops.object.select_all(action="SELECT")
bpy.ops.object.delete()


def import_stl(path):
    if hasattr(bpy.ops.wm, "stl_import"):
        bpy.ops.wm.stl_import(filepath=path)
    else:
        bpy.ops.import_mesh.stl(filepath=path)
    return bpy.context.selected_objects[0]


def export_stl(path):
    if hasattr(bpy.ops.wm, "stl_export"):
        bpy.ops.wm.stl_export(filepath=path, export_selected_objects=True)
    else:
        bpy.ops.export_mesh.stl(filepath=path, use_selection=True)


objects = [import_stl(path) for path in inputs]
base, others = objects[0], objects[1:]
bpy.context.view_layer.objects.active = base

for other in others:
    modifier = base.modifiers.new(name="boolean", type="BOOLEAN")
    modifier.operation = operation
    modifier.solver = "EXACT"
    modifier.object = other
    bpy.ops.object.modifier_apply(modifier=modifier.name)

for other in others:
    bpy.data.objects.remove(other, do_unlink=True)

bpy.ops.object.select_all(action="DESELECT")
base.select_set(True)
export_stl(output)
"#;

/// Runs `blender --background` with boolean modifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct BlenderEngine;

impl BlenderEngine {
    fn run(&self, op: Operation, operands: &[&Mesh]) -> anyhow::Result<Mesh> {
        let program = command_for(Engine::Blender).unwrap_or("blender");
        let exchange = Exchange::new(operands)?;

        let script = exchange.path("boolean.py");
        std::fs::write(&script, SCRIPT).context("Failed to write Blender script")?;

        let mut command = Command::new(program);
        command
            .arg("--background")
            .arg("--factory-startup")
            .arg("--python-exit-code")
            .arg("1")
            .arg("--python")
            .arg(&script)
            .arg("--")
            .arg(modifier_operation(op))
            .arg(exchange.output())
            .args(exchange.inputs());

        run(&mut command, program)?;
        exchange.read_output()
    }
}

impl BooleanEngine for BlenderEngine {
    fn engine(&self) -> Engine {
        Engine::Blender
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
            .map_err(|error| BooleanError::computation(Engine::Blender, op, error))
    }
}

/// Blender boolean modifier operation name
fn modifier_operation(op: Operation) -> &'static str {
    match op {
        Operation::Union => "UNION",
        Operation::Intersection => "INTERSECT",
        Operation::Difference => "DIFFERENCE",
    }
}
