//! # engine_demo
//!
//! Headless bouncing-shapes simulation on top of `engine_ecs`.
//!
//! ## Startup Sequence
//!
//! 1. Load the JSON config (optional) and apply command-line overrides.
//! 2. Build the world and spawn the scene.
//! 3. Run the fixed-timestep tick loop.
//! 4. Report the final state, optionally dumping every table.

mod components;
mod config;
mod scene;
mod systems;
mod tick;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engine_ecs::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{Circle, Position, Rectangle};
use config::SimConfig;
use tick::TickLoop;

#[derive(Parser)]
#[command(name = "engine_demo", about = "Bouncing shapes on an entity/component world")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of shapes to spawn
    #[arg(short, long)]
    entities: Option<usize>,

    /// Number of ticks to run (0 runs until interrupted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Pace ticks in wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Print every component table after the run
    #[arg(long)]
    dump: bool,
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(entities) = self.entities {
            config.entity_count = entities;
        }
        if let Some(ticks) = self.ticks {
            config.max_ticks = ticks;
        }
        if let Some(rate) = self.tick_rate {
            config.tick_rate = rate;
        }
        config.realtime |= self.realtime;
        config.tick_config().period().context("invalid tick rate")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "engine_demo=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.sim_config()?;
    info!(?config, "configuration loaded");

    let mut world = World::with_config(config.world.clone());
    scene::register_components(&mut world);
    scene::spawn_shapes(&mut world, &config).context("failed to spawn scene")?;

    let mut tick_loop = TickLoop::new(config.tick_config(), world, config.bounds);
    tick_loop.run().context("tick loop failed")?;

    let ticks = tick_loop.tick_id();
    let world = tick_loop.world_mut();
    let circles = world.view::<(Position, Circle)>()?.count();
    let rectangles = world.view::<(Position, Rectangle)>()?.count();
    info!(
        ticks,
        entities = world.entity_count(),
        circles,
        rectangles,
        "simulation finished"
    );

    if args.dump {
        println!("{}", tick_loop.world().dump());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("engine_demo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["--entities", "3", "--ticks", "7", "--realtime"])
            .sim_config()
            .unwrap();
        assert_eq!(config.entity_count, 3);
        assert_eq!(config.max_ticks, 7);
        assert!(config.realtime);
    }

    #[test]
    fn test_unusable_tick_rate_is_rejected() {
        assert!(parse(&["--tick-rate", "1e-20"]).sim_config().is_err());
        assert!(parse(&["--tick-rate", "0"]).sim_config().is_err());
    }
}
