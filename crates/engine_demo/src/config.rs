//! Simulation configuration.
//!
//! Loaded from an optional JSON file; every field has a default so a
//! partial file (or none at all) is valid. Command-line flags override
//! the loaded values in `main`.

use std::path::Path;

use anyhow::{Context, Result};
use engine_ecs::WorldConfig;
use serde::Deserialize;

use crate::systems::Bounds;
use crate::tick::TickConfig;

/// Top-level configuration for the demo binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep between ticks to hold `tick_rate` in wall-clock time.
    pub realtime: bool,
    /// Number of shapes to spawn.
    pub entity_count: usize,
    /// Box the shapes bounce inside.
    pub bounds: Bounds,
    /// Upper bound on the per-axis speed of spawned shapes.
    pub max_speed: f32,
    /// Storage behaviour of the world.
    pub world: WorldConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 600,
            realtime: false,
            entity_count: 16,
            bounds: Bounds::default(),
            max_speed: 120.0,
            world: WorldConfig::default(),
        }
    }
}

impl SimConfig {
    /// Read a config file from disk.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON for this shape.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Tick loop settings derived from this config.
    #[must_use]
    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            tick_rate: self.tick_rate,
            max_ticks: self.max_ticks,
            realtime: self.realtime,
        }
    }
}
