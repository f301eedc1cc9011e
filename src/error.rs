// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for boolean dispatch

use crate::boolean::{Engine, Operation};
use thiserror::Error;

/// Errors returned by boolean operations
///
/// Every variant is fatal for the call that produced it. Engine failures are
/// never replaced by a fallback engine or a degenerate mesh.
#[derive(Error, Debug)]
pub enum BooleanError {
    /// Too few operands, or not exactly two for a pairwise engine
    #[error("invalid operand count for {op}: expected {required}, got {actual}")]
    InvalidOperandCount {
        op: Operation,
        required: usize,
        actual: usize,
    },

    /// The requested engine name is not known
    #[error("unsupported boolean engine '{0}'")]
    UnsupportedEngine(String),

    /// The engine is known but cannot be used on this machine
    #[error("boolean engine '{0}' is not available")]
    EngineUnavailable(Engine),

    #[error("{engine} failed to compute {op}: {message}")]
    EngineComputationFailed {
        engine: Engine,
        op: Operation,
        message: String,
    },

    /// An input mesh is not a closed positive volume
    #[error("operand {index} is not a closed volume")]
    NotAVolume { index: usize },
}

impl BooleanError {
    /// Wrap an internal error chain as an engine failure
    pub(crate) fn computation(engine: Engine, op: Operation, error: anyhow::Error) -> Self {
        Self::EngineComputationFailed {
            engine,
            op,
            message: format!("{error:#}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, BooleanError>;
