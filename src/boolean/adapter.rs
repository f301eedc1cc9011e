// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine adapter contract

use super::{Engine, Operation};
use crate::engines::{BlenderEngine, BspEngine, OpenScadEngine, ParallelEngine};
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;

/// Uniform interface over boolean engines
///
/// Adapters hold no per-call state and may be called from several threads at
/// once. Pairwise adapters accept exactly two operands; N-ary adapters accept
/// one or more and return a copy of a single operand. Difference always
/// treats `operands[0]` as the positive term.
pub trait BooleanEngine: Send + Sync {
    fn engine(&self) -> Engine;

    /// Whether `compute` accepts more than two operands for `op`
    fn supports_nary(&self, op: Operation) -> bool;

    fn compute(&self, op: Operation, operands: &[&Mesh]) -> Result<Mesh>;

    /// Check the operand count against this adapter's contract
    fn check_operands(&self, op: Operation, operands: &[&Mesh]) -> Result<()> {
        let valid = if self.supports_nary(op) {
            !operands.is_empty()
        } else {
            operands.len() == 2
        };
        if valid {
            return Ok(());
        }
        Err(BooleanError::InvalidOperandCount {
            op,
            required: if self.supports_nary(op) { 1 } else { 2 },
            actual: operands.len(),
        })
    }
}

static BSP: BspEngine = BspEngine;
static PARALLEL: ParallelEngine = ParallelEngine;
static BLENDER: BlenderEngine = BlenderEngine;
static OPENSCAD: OpenScadEngine = OpenScadEngine;

/// Adapter for an engine
pub fn adapter(engine: Engine) -> &'static dyn BooleanEngine {
    match engine {
        Engine::Bsp => &BSP,
        Engine::Parallel => &PARALLEL,
        Engine::Blender => &BLENDER,
        Engine::OpenScad => &OPENSCAD,
    }
}
