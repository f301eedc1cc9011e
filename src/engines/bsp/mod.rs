// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Built-in BSP boolean kernel

mod plane;
mod polygon;
mod tree;

use crate::boolean::{BooleanEngine, Engine, Operation};
use crate::config::BooleanConfig;
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;
use anyhow::ensure;
use tree::BspTree;

/// Pairwise engine backed by the in-process BSP kernel
#[derive(Debug, Default, Clone, Copy)]
pub struct BspEngine;

impl BooleanEngine for BspEngine {
    fn engine(&self) -> Engine {
        Engine::Bsp
    }

    fn supports_nary(&self, _op: Operation) -> bool {
        false
    }

    fn compute(&self, op: Operation, operands: &[&Mesh]) -> Result<Mesh> {
        self.check_operands(op, operands)?;
        combine(op, operands[0], operands[1], BooleanConfig::global())
            .map_err(|error| BooleanError::computation(Engine::Bsp, op, error))
    }
}

/// Combine two closed meshes and clean up the result
///
/// An empty operand encloses nothing, so it never reaches the BSP trees: an
/// empty tree would clip nothing and read as all of space.
pub(crate) fn combine(
    op: Operation,
    a: &Mesh,
    b: &Mesh,
    config: &BooleanConfig,
) -> anyhow::Result<Mesh> {
    ensure!(
        a.is_finite() && b.is_finite(),
        "operand contains non-finite coordinates"
    );

    if a.is_empty() || b.is_empty() {
        return Ok(match op {
            Operation::Union if a.is_empty() => b.clone(),
            Operation::Union => a.clone(),
            Operation::Difference if a.is_empty() => Mesh::empty(),
            Operation::Difference => a.clone(),
            Operation::Intersection => Mesh::empty(),
        });
    }

    let epsilon = config.plane_epsilon;
    let mut a = BspTree::new(polygon::from_mesh(a), epsilon);
    let mut b = BspTree::new(polygon::from_mesh(b), epsilon);

    match op {
        Operation::Union => {
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.into_polygons());
        }
        Operation::Difference => {
            a.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.into_polygons());
            a.invert();
        }
        Operation::Intersection => {
            a.invert();
            b.clip_to(&a);
            b.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            a.build(b.into_polygons());
            a.invert();
        }
    }

    let mut mesh = polygon::to_mesh(&a.into_polygons());
    // points within the plane epsilon were never split apart, so they must weld
    let tolerance =
        config.merge_tolerance.max(config.plane_epsilon) * mesh.bounds().diagonal().max(1.0);
    mesh.repair(tolerance);

    ensure!(mesh.is_finite(), "{op} produced non-finite coordinates");
    ensure_closed(op, &mesh)?;
    Ok(mesh)
}

/// Fail unless `mesh` is empty or a closed, consistently wound surface
fn ensure_closed(op: Operation, mesh: &Mesh) -> anyhow::Result<()> {
    if mesh.is_empty() {
        return Ok(());
    }
    ensure!(
        mesh.is_watertight(),
        "{op} left open edges in a {} triangle result",
        mesh.triangle_count()
    );
    ensure!(
        mesh.is_winding_consistent(),
        "{op} left inconsistent winding in a {} triangle result",
        mesh.triangle_count()
    );
    Ok(())
}
