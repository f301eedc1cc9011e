// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engines that run an external program over STL files

mod blender;
mod openscad;

pub use blender::BlenderEngine;
pub use openscad::OpenScadEngine;

use crate::boolean::Engine;
use crate::config::BooleanConfig;
use crate::geometry::{Mesh, Triangle};
use anyhow::{bail, Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};
use tempfile::TempDir;

/// Executable configured for an external engine
pub(crate) fn command_for(engine: Engine) -> Option<&'static str> {
    let config = BooleanConfig::global();
    match engine {
        Engine::Blender => Some(config.blender_command()),
        Engine::OpenScad => Some(config.openscad_command()),
        Engine::Bsp | Engine::Parallel => None,
    }
}

/// Check that an external engine's program starts and reports a version
pub(crate) fn probe(engine: Engine) -> bool {
    let Some(program) = command_for(engine) else {
        return true;
    };
    match Command::new(program).arg("--version").output() {
        Ok(output) => output.status.success(),
        Err(error) => {
            log::debug!("Probing {program} failed: {error}");
            false
        }
    }
}

/// Scratch directory holding operand STL files and the engine's output
pub(crate) struct Exchange {
    dir: TempDir,
    inputs: Vec<PathBuf>,
    output: PathBuf,
}

impl Exchange {
    pub fn new(operands: &[&Mesh]) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("polyframe-boolean")
            .tempdir()
            .context("Failed to create scratch directory")?;

        let inputs = operands
            .iter()
            .enumerate()
            .map(|(index, mesh)| {
                let path = dir.path().join(format!("operand_{index}.stl"));
                write_stl(mesh, &path)?;
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()?;
        let output = dir.path().join("result.stl");

        Ok(Self {
            dir,
            inputs,
            output,
        })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Path for an auxiliary file such as a generated script
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read_output(&self) -> Result<Mesh> {
        if !self.output.exists() {
            bail!("engine did not write {}", self.output.display());
        }
        read_stl(&self.output)
    }
}

/// Run a prepared command, failing with its diagnostics on a non-zero exit
pub(crate) fn run(command: &mut Command, program: &str) -> Result<Output> {
    log::debug!("Running {command:?}");
    let output = command
        .output()
        .with_context(|| format!("Failed to execute {program}"))?;

    if !output.status.success() {
        bail!(
            "{program} exited with status {}: {}",
            output.status,
            last_lines(&output.stderr, 5)
        );
    }
    Ok(output)
}

/// Trailing lines of process output, for error messages
fn last_lines(bytes: &[u8], count: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(count)..].join(" | ")
}

/// Write a mesh as binary STL
pub(crate) fn write_stl(mesh: &Mesh, path: &Path) -> Result<()> {
    let triangles: Vec<StlTriangle> = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let [p0, p1, p2] = mesh.corners(triangle);
            let normal = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);

            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [p0, p1, p2].map(|p| StlVertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter())
        .with_context(|| format!("Failed to write STL file: {}", path.display()))?;
    Ok(())
}

/// Read an STL file (binary or ASCII) into an indexed mesh
pub(crate) fn read_stl(path: &Path) -> Result<Mesh> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open STL file: {}", path.display()))?;
    let stl = stl_io::read_stl(&mut file)
        .with_context(|| format!("Failed to read STL file: {}", path.display()))?;

    let vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let triangles = stl
        .faces
        .iter()
        .map(|face| Triangle::new(face.vertices))
        .collect();

    let mesh = Mesh::from_parts(vertices, triangles);
    if !mesh.has_valid_indices() || !mesh.is_finite() {
        bail!("STL file {} holds an invalid mesh", path.display());
    }
    Ok(mesh)
}
