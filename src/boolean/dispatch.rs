// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean dispatch: validation, engine selection and reduction strategy

use super::{adapter, resolve, BooleanEngine, Operation};
use crate::cascade::try_reduce_cascade;
use crate::error::{BooleanError, Result};
use crate::geometry::Mesh;
use std::borrow::Cow;

/// Options for [`apply_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanOptions {
    /// Engine name or alias; `None` picks the first available engine
    pub engine: Option<String>,
    /// Reject caller meshes that are not closed positive volumes
    pub check_volume: bool,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            engine: None,
            check_volume: true,
        }
    }
}

impl BooleanOptions {
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn with_check_volume(mut self, check_volume: bool) -> Self {
        self.check_volume = check_volume;
        self
    }
}

/// Union of all meshes
pub fn union<'a, I>(meshes: I, engine: Option<&str>) -> Result<Mesh>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    apply(Operation::Union, meshes, engine)
}

/// Volume shared by all meshes
pub fn intersection<'a, I>(meshes: I, engine: Option<&str>) -> Result<Mesh>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    apply(Operation::Intersection, meshes, engine)
}

/// First mesh minus all the others
pub fn difference<'a, I>(meshes: I, engine: Option<&str>) -> Result<Mesh>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    apply(Operation::Difference, meshes, engine)
}

/// Apply `op` to `meshes` with the given engine and default options
pub fn apply<'a, I>(op: Operation, meshes: I, engine: Option<&str>) -> Result<Mesh>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let options = BooleanOptions {
        engine: engine.map(str::to_string),
        ..BooleanOptions::default()
    };
    apply_with(op, meshes, &options)
}

/// Apply `op` to `meshes`
///
/// Two meshes go straight to the engine. Longer inputs go to the engine in
/// one call when it handles N-ary input for `op`, and are otherwise reduced
/// pairwise in balanced rounds. Pairwise difference unions the subtrahends
/// first, then subtracts that union from the first mesh once.
///
/// The result is returned as the engine produced it; it is not re-validated.
pub fn apply_with<'a, I>(op: Operation, meshes: I, options: &BooleanOptions) -> Result<Mesh>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let meshes: Vec<&Mesh> = meshes.into_iter().collect();

    let required = op.min_operands();
    if meshes.len() < required {
        return Err(BooleanError::InvalidOperandCount {
            op,
            required,
            actual: meshes.len(),
        });
    }

    let engine = resolve(options.engine.as_deref())?;

    if options.check_volume {
        if let Some(index) = meshes.iter().position(|mesh| !mesh.is_volume()) {
            return Err(BooleanError::NotAVolume { index });
        }
    }

    let adapter = adapter(engine);
    match meshes.len() {
        2 => {
            log::debug!("{op} of 2 meshes on {engine}");
            adapter.compute(op, &meshes)
        }
        n if n > 2 && adapter.supports_nary(op) => {
            log::debug!("{op} of {n} meshes on {engine} in one call");
            adapter.compute(op, &meshes)
        }
        n if op == Operation::Difference => {
            log::debug!("{op} of {n} meshes on {engine}: cascaded union of subtrahends");
            let subtrahend = cascade(adapter, Operation::Union, &meshes[1..])?;
            adapter.compute(op, &[meshes[0], &subtrahend])
        }
        n => {
            log::debug!("{op} of {n} meshes on {engine}: cascade");
            cascade(adapter, op, &meshes)
        }
    }
}

/// Reduce meshes pairwise through an adapter, borrowing operands until the
/// first combination
fn cascade(adapter: &dyn BooleanEngine, op: Operation, meshes: &[&Mesh]) -> Result<Mesh> {
    let reduced = try_reduce_cascade(meshes.iter().map(|&mesh| Cow::Borrowed(mesh)), |left, right| {
        adapter
            .compute(op, &[&*left, &*right])
            .map(Cow::Owned)
    })?;

    reduced
        .map(Cow::into_owned)
        .ok_or(BooleanError::InvalidOperandCount {
            op,
            required: 1,
            actual: 0,
        })
}
