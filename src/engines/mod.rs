// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean engine implementations

pub(crate) mod bsp;
pub(crate) mod external;
mod parallel;

pub use bsp::BspEngine;
pub use external::{BlenderEngine, OpenScadEngine};
pub use parallel::ParallelEngine;
