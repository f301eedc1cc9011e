// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! N-ary boolean operations reduced on the rayon pool

use super::bsp;
use crate::boolean::{BooleanEngine, Engine, Operation};
use crate::config::BooleanConfig;
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;
use rayon::prelude::*;
use std::borrow::Cow;

/// BSP kernel driven by an order-preserving parallel reduction
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelEngine;

impl ParallelEngine {
    /// Reduce meshes with `op` in parallel; neighbouring operands are
    /// combined first, so the order of non-commutative input is kept
    fn reduce(op: Operation, meshes: &[&Mesh], config: &BooleanConfig) -> Result<Mesh> {
        let reduced = meshes
            .par_iter()
            .map(|&mesh| Ok::<_, BooleanError>(Cow::Borrowed(mesh)))
            .try_reduce_with(|left, right| {
                bsp::combine(op, &left, &right, config)
                    .map(Cow::Owned)
                    .map_err(|error| BooleanError::computation(Engine::Parallel, op, error))
            });

        match reduced {
            Some(mesh) => mesh.map(Cow::into_owned),
            None => Err(BooleanError::InvalidOperandCount {
                op,
                required: 1,
                actual: 0,
            }),
        }
    }
}

impl BooleanEngine for ParallelEngine {
    fn engine(&self) -> Engine {
        Engine::Parallel
    }

    fn supports_nary(&self, _op: Operation) -> bool {
        true
    }

    fn compute(&self, op: Operation, operands: &[&Mesh]) -> Result<Mesh> {
        self.check_operands(op, operands)?;
        let config = BooleanConfig::global();

        match (op, operands) {
            (_, [mesh]) => Ok(Mesh::clone(mesh)),
            (Operation::Difference, [minuend, subtrahends @ ..]) => {
                let subtrahend = Self::reduce(Operation::Union, subtrahends, config)?;
                bsp::combine(op, minuend, &subtrahend, config)
                    .map_err(|error| BooleanError::computation(Engine::Parallel, op, error))
            }
            _ => Self::reduce(op, operands, config),
        }
    }
}
