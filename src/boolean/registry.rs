// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine registry

use crate::engines::external;
use crate::error::{BooleanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Known boolean engines, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Built-in BSP kernel, one pair at a time
    Bsp,
    /// Built-in BSP kernel reduced on the rayon pool
    Parallel,
    /// Blender's exact boolean solver, run as a subprocess
    Blender,
    /// OpenSCAD, run as a subprocess
    OpenScad,
}

impl Engine {
    pub const ALL: [Engine; 4] = [Engine::Bsp, Engine::Parallel, Engine::Blender, Engine::OpenScad];

    pub fn name(self) -> &'static str {
        match self {
            Engine::Bsp => "bsp",
            Engine::Parallel => "parallel",
            Engine::Blender => "blender",
            Engine::OpenScad => "openscad",
        }
    }

    /// Look up an engine by name or alias, ignoring case
    pub fn from_name(name: &str) -> Option<Engine> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bsp" | "csg" => Some(Engine::Bsp),
            "parallel" | "rayon" => Some(Engine::Parallel),
            "blender" => Some(Engine::Blender),
            "openscad" | "scad" => Some(Engine::OpenScad),
            _ => None,
        }
    }

    /// Engines that run inside this process
    pub fn is_builtin(self) -> bool {
        matches!(self, Engine::Bsp | Engine::Parallel)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every known engine, whether or not it can run here
pub fn all_engines() -> Vec<Engine> {
    Engine::ALL.to_vec()
}

/// Engines usable right now, in priority order
pub fn available_engines() -> Vec<Engine> {
    Engine::ALL
        .into_iter()
        .filter(|&engine| is_available(engine))
        .collect()
}

/// Check whether an engine can run; external tools are probed once per process
pub fn is_available(engine: Engine) -> bool {
    static BLENDER: OnceLock<bool> = OnceLock::new();
    static OPENSCAD: OnceLock<bool> = OnceLock::new();

    let cache = match engine {
        Engine::Bsp | Engine::Parallel => return true,
        Engine::Blender => &BLENDER,
        Engine::OpenScad => &OPENSCAD,
    };

    *cache.get_or_init(|| {
        let available = external::probe(engine);
        log::info!(
            "Boolean engine '{}' is {}",
            engine,
            if available { "available" } else { "not available" }
        );
        available
    })
}

/// Resolve an optional engine name to a usable engine
///
/// `None` selects the first available engine.
pub fn resolve(requested: Option<&str>) -> Result<Engine> {
    let Some(name) = requested else {
        // built-in engines are always available, so this never comes up empty
        return available_engines()
            .first()
            .copied()
            .ok_or_else(|| BooleanError::UnsupportedEngine(String::new()));
    };

    let engine =
        Engine::from_name(name).ok_or_else(|| BooleanError::UnsupportedEngine(name.to_string()))?;
    if !is_available(engine) {
        return Err(BooleanError::EngineUnavailable(engine));
    }
    Ok(engine)
}
