// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean engine configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "polyframe-boolean.toml";

/// Environment variable naming an alternative configuration file
pub const CONFIG_ENV: &str = "POLYFRAME_BOOLEAN_CONFIG";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanConfig {
    /// Blender executable, `blender` on PATH when unset
    pub blender_path: Option<String>,
    /// OpenSCAD executable, `openscad` on PATH when unset
    pub openscad_path: Option<String>,
    /// Thickness of a BSP splitting plane
    pub plane_epsilon: f64,
    /// Vertex weld distance relative to the result size; never below
    /// `plane_epsilon`
    pub merge_tolerance: f64,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            blender_path: None,
            openscad_path: None,
            plane_epsilon: 1e-8,
            merge_tolerance: 1e-8,
        }
    }
}

impl BooleanConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: BooleanConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(blender) = std::env::var("BLENDER_PATH") {
            config.blender_path = Some(blender);
        }

        if let Ok(openscad) = std::env::var("OPENSCAD_PATH") {
            config.openscad_path = Some(openscad);
        }

        Ok(config)
    }

    /// Process-wide configuration, loaded on first use
    pub fn global() -> &'static BooleanConfig {
        static CONFIG: OnceLock<BooleanConfig> = OnceLock::new();
        CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|error| {
                log::warn!("Falling back to default boolean config: {error:#}");
                Self::default()
            })
        })
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn blender_command(&self) -> &str {
        self.blender_path.as_deref().unwrap_or("blender")
    }

    pub fn openscad_command(&self) -> &str {
        self.openscad_path.as_deref().unwrap_or("openscad")
    }
}
