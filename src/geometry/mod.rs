// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and clean-up

mod analytics;
mod bbox;
mod mesh;
mod primitives;
mod repair;
mod topology;

pub use analytics::{analyze, MeshStats};
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle};
pub use primitives::Primitive;
