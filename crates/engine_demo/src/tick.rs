//! Fixed-timestep tick loop.
//!
//! Each tick runs the systems in a fixed order against the owned world:
//!
//! 1. [`Movement`] integrates velocities.
//! 2. [`Collision`] reflects shapes off the bounds.
//! 3. The tick counter advances.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use engine_ecs::{EcsError, World};
use tracing::{debug, info, warn};

use crate::systems::{Bounds, Collision, Movement};

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep out the remainder of each tick's budget.
    pub realtime: bool,
}

impl TickConfig {
    /// Wall-clock length of one tick.
    ///
    /// # Errors
    ///
    /// Fails when `tick_rate` is not positive or the period does not fit a
    /// [`Duration`].
    pub fn period(&self) -> Result<Duration> {
        anyhow::ensure!(
            self.tick_rate > 0.0,
            "tick rate must be positive, got {}",
            self.tick_rate
        );
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .with_context(|| format!("tick rate {} has no usable tick period", self.tick_rate))
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            realtime: false,
        }
    }
}

/// The simulation's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Number of completed ticks.
    tick_id: u64,
    config: TickConfig,
    world: World,
    movement: Movement,
    collision: Collision,
}

impl TickLoop {
    /// Create a tick loop over an already populated world.
    #[must_use]
    pub fn new(config: TickConfig, world: World, bounds: Bounds) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
            movement: Movement,
            collision: Collision::new(bounds),
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Run one tick of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Propagates a system failure; the tick counter is not advanced.
    pub fn tick(&mut self, dt: f32) -> Result<(), EcsError> {
        debug!(tick_id = self.tick_id + 1, dt, "tick start");

        self.movement.update(&mut self.world, dt)?;
        self.collision.update(&mut self.world)?;

        self.tick_id += 1;
        Ok(())
    }

    /// Run the tick loop for the configured number of ticks, or
    /// indefinitely when `max_ticks` is zero.
    ///
    /// # Errors
    ///
    /// Fails before the first tick if the tick rate has no valid period, and
    /// stops at the first failing tick.
    pub fn run(&mut self) -> Result<()> {
        let tick_duration = self.config.period()?;
        let dt = tick_duration.as_secs_f32();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realtime = self.config.realtime,
            entities = self.world.entity_count(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick(dt)?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                return Ok(());
            }

            if !self.config.realtime {
                continue;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::components::{Circle, Position, Velocity};
    use crate::scene;

    fn small_box() -> Bounds {
        Bounds {
            min: Vec2::ZERO,
            max: Vec2::new(100.0, 100.0),
        }
    }

    fn populated_world() -> World {
        let mut world = World::new();
        scene::register_components(&mut world);
        world
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), populated_world(), small_box());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(1.0 / 60.0).unwrap();
        assert_eq!(tick_loop.tick_id(), 1);
        tick_loop.tick(1.0 / 60.0).unwrap();
        assert_eq!(tick_loop.tick_id(), 2);
    }

    #[test]
    fn test_tick_moves_then_collides() {
        let mut world = populated_world();
        let e = world.create_entity();
        world
            .add_components(
                e,
                (
                    Position::new(90.0, 50.0),
                    Velocity::new(20.0, 0.0),
                    Circle { radius: 5.0 },
                ),
            )
            .unwrap();

        let mut tick_loop = TickLoop::new(TickConfig::default(), world, small_box());
        tick_loop.tick(0.5).unwrap();

        // Moved to x = 100, then pulled back to the right wall minus radius.
        let world = tick_loop.world();
        assert_eq!(world.get_component::<Position>(e), Ok(&Position::new(95.0, 50.0)));
        assert_eq!(world.get_component::<Velocity>(e), Ok(&Velocity::new(-20.0, 0.0)));
    }

    #[test]
    fn test_failing_tick_does_not_advance() {
        let mut tick_loop = TickLoop::new(TickConfig::default(), World::new(), small_box());
        assert!(tick_loop.tick(1.0).is_err());
        assert_eq!(tick_loop.tick_id(), 0);
    }

    #[test]
    fn test_run_limited_ticks() {
        let config = TickConfig {
            tick_rate: 1000.0,
            max_ticks: 5,
            realtime: false,
        };
        let mut tick_loop = TickLoop::new(config, populated_world(), small_box());
        tick_loop.run().unwrap();
        assert_eq!(tick_loop.tick_id(), 5);
    }

    #[test]
    fn test_period_rejects_unusable_rates() {
        let rate = |tick_rate| TickConfig {
            tick_rate,
            ..TickConfig::default()
        };
        assert_eq!(rate(50.0).period().unwrap(), Duration::from_millis(20));
        assert!(rate(1e-20).period().is_err());
        assert!(rate(0.0).period().is_err());
        assert!(rate(-5.0).period().is_err());
        assert!(rate(f64::NAN).period().is_err());
    }

    #[test]
    fn test_run_with_tiny_rate_fails_without_ticking() {
        let config = TickConfig {
            tick_rate: 1e-20,
            max_ticks: 1,
            realtime: false,
        };
        let mut tick_loop = TickLoop::new(config, populated_world(), small_box());
        assert!(tick_loop.run().is_err());
        assert_eq!(tick_loop.tick_id(), 0);
    }

    #[test]
    fn test_run_realtime_paces_ticks() {
        let config = TickConfig {
            tick_rate: 200.0,
            max_ticks: 3,
            realtime: true,
        };
        let mut tick_loop = TickLoop::new(config, populated_world(), small_box());
        let start = Instant::now();
        tick_loop.run().unwrap();
        // Two sleeps between three ticks.
        assert!(start.elapsed() >= Duration::from_millis(9));
        assert_eq!(tick_loop.tick_id(), 3);
    }
}
