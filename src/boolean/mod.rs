// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations over closed meshes
//!
//! The public surface is [`union`], [`intersection`], [`difference`] and
//! [`apply`], plus method forms on [`Mesh`]. Every call resolves an engine
//! through the registry, then either hands all operands to the engine at once
//! or reduces them pairwise with [`crate::cascade`].

mod adapter;
mod dispatch;
mod registry;

pub use adapter::{adapter, BooleanEngine};
pub use dispatch::{apply, apply_with, difference, intersection, union, BooleanOptions};
pub use registry::{all_engines, available_engines, is_available, resolve, Engine};

use crate::error::Result;
use crate::geometry::Mesh;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set operation applied to a sequence of meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Union,
    Intersection,
    /// First operand minus all remaining operands
    Difference,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::Union,
        Operation::Intersection,
        Operation::Difference,
    ];

    /// Minimum number of meshes a call must supply
    pub fn min_operands(self) -> usize {
        match self {
            Operation::Union | Operation::Intersection => 1,
            Operation::Difference => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Union => "union",
            Operation::Intersection => "intersection",
            Operation::Difference => "difference",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Mesh {
    /// Union of this mesh with `others`
    pub fn union<'a, I>(&'a self, others: I, engine: Option<&str>) -> Result<Mesh>
    where
        I: IntoIterator<Item = &'a Mesh>,
    {
        apply(Operation::Union, std::iter::once(self).chain(others), engine)
    }

    /// Intersection of this mesh with `others`
    pub fn intersection<'a, I>(&'a self, others: I, engine: Option<&str>) -> Result<Mesh>
    where
        I: IntoIterator<Item = &'a Mesh>,
    {
        apply(Operation::Intersection, std::iter::once(self).chain(others), engine)
    }

    /// This mesh minus every mesh in `others`
    pub fn difference<'a, I>(&'a self, others: I, engine: Option<&str>) -> Result<Mesh>
    where
        I: IntoIterator<Item = &'a Mesh>,
    {
        apply(Operation::Difference, std::iter::once(self).chain(others), engine)
    }
}
