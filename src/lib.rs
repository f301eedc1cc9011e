// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Boolean
//!
//! Union, intersection and difference over closed triangle meshes, computed
//! by one of several interchangeable engines. Inputs longer than two meshes
//! are either handed to an engine that takes them all at once or reduced
//! pairwise in balanced rounds.
//!
//! ```no_run
//! use nalgebra::Vector3;
//! use polyframe_boolean::{union, Primitive};
//!
//! let a = Primitive::icosphere(1.0, 3).to_mesh();
//! let b = a.clone().translated(Vector3::new(0.0, 0.0, 0.75));
//! let merged = union([&a, &b], None)?;
//! assert!(merged.is_volume());
//! # Ok::<(), polyframe_boolean::BooleanError>(())
//! ```

pub mod boolean;
pub mod cascade;
pub mod config;
pub mod engines;
pub mod error;
pub mod geometry;

pub use boolean::{
    adapter, all_engines, apply, apply_with, available_engines, difference, intersection,
    is_available, resolve, union, BooleanEngine, BooleanOptions, Engine, Operation,
};
pub use cascade::{reduce_cascade, try_reduce_cascade};
pub use config::BooleanConfig;
pub use error::{BooleanError, Result};
pub use geometry::{analyze, BoundingBox, Mesh, MeshStats, Primitive, Triangle};
