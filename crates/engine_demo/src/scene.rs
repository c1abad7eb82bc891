//! Initial world contents.

use engine_ecs::{EcsError, Entity, World};
use glam::Vec2;
use tracing::{debug, info};

use crate::components::{Circle, Position, Rectangle, ShapeColor, Velocity};
use crate::config::SimConfig;

const PALETTE: [ShapeColor; 4] = [
    ShapeColor::rgb(0xe6, 0x39, 0x46),
    ShapeColor::rgb(0x2a, 0x9d, 0x8f),
    ShapeColor::rgb(0xe9, 0xc4, 0x6a),
    ShapeColor::rgb(0x45, 0x7b, 0x9d),
];

/// Register every component type the simulation uses.
pub fn register_components(world: &mut World) {
    world
        .register_component::<Position>()
        .register_component::<Velocity>()
        .register_component::<Circle>()
        .register_component::<Rectangle>()
        .register_component::<ShapeColor>();
}

/// Spawn `config.entity_count` shapes, alternating circles and rectangles.
///
/// Placement is a low-discrepancy sequence over the bounds, so the same
/// config always produces the same scene.
///
/// # Errors
///
/// Fails if a shape component is not registered and the world is strict.
pub fn spawn_shapes(world: &mut World, config: &SimConfig) -> Result<Vec<Entity>, EcsError> {
    let extent = config.bounds.max - config.bounds.min;
    let mut spawned = Vec::with_capacity(config.entity_count);

    for n in 0..config.entity_count {
        let i = n as f32;
        let unit = Vec2::new(sequence(i, 0.618_034), sequence(i, 0.754_878));
        let heading = Vec2::new(sequence(i, 0.414_214), sequence(i, 0.324_718)) * 2.0 - 1.0;

        let position = Position(config.bounds.min + unit * extent);
        let velocity = Velocity(heading * config.max_speed);
        let color = PALETTE[n % PALETTE.len()];

        let entity = world.create_entity_named(format!("shape-{n}"));
        if n % 2 == 0 {
            let circle = Circle {
                radius: 8.0 + (n % 3) as f32 * 4.0,
            };
            world.add_components(entity, (position, velocity, circle, color))?;
        } else {
            let rect = Rectangle {
                width: 16.0 + (n % 4) as f32 * 4.0,
                height: 12.0 + (n % 3) as f32 * 4.0,
            };
            world.add_components(entity, (position, velocity, rect, color))?;
        }

        debug!(%entity, color = %format_args!("{:#010x}", color.packed()), "spawned shape");
        spawned.push(entity);
    }

    info!(count = spawned.len(), "scene spawned");
    Ok(spawned)
}

/// Fractional part of `0.5 + i * step`, in `[0, 1)`.
fn sequence(i: f32, step: f32) -> f32 {
    (0.5 + i * step).fract()
}

#[cfg(test)]
mod tests {
    use engine_ecs::WorldConfig;

    use super::*;

    fn config(count: usize) -> SimConfig {
        SimConfig {
            entity_count: count,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_spawn_alternates_shapes() {
        let mut world = World::new();
        register_components(&mut world);
        let spawned = spawn_shapes(&mut world, &config(5)).unwrap();

        assert_eq!(spawned.len(), 5);
        assert_eq!(world.view::<(Circle,)>().unwrap().count(), 3);
        assert_eq!(world.view::<(Rectangle,)>().unwrap().count(), 2);
        assert_eq!(world.view::<(Position, Velocity, ShapeColor)>().unwrap().count(), 5);
        assert_eq!(world.entity_label(spawned[3]), Some("shape-3"));
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let positions = |count| {
            let mut world = World::new();
            register_components(&mut world);
            let spawned = spawn_shapes(&mut world, &config(count)).unwrap();
            spawned
                .iter()
                .map(|&e| *world.get_component::<Position>(e).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(8), positions(8));
    }

    #[test]
    fn test_spawn_stays_inside_bounds() {
        let cfg = config(32);
        let mut world = World::new();
        register_components(&mut world);
        spawn_shapes(&mut world, &cfg).unwrap();

        world.view::<(Position, Velocity)>().unwrap().each(|_, pos, vel| {
            assert!(pos.0.cmpge(cfg.bounds.min).all());
            assert!(pos.0.cmplt(cfg.bounds.max).all());
            assert!(vel.0.abs().cmple(Vec2::splat(cfg.max_speed)).all());
        });
    }

    #[test]
    fn test_strict_world_requires_registration() {
        let mut world = World::with_config(WorldConfig::strict());
        assert!(matches!(
            spawn_shapes(&mut world, &config(1)),
            Err(EcsError::ComponentTypeNotRegistered(_))
        ));
    }

    #[test]
    fn test_lazy_world_spawns_without_registration() {
        let mut world = World::with_config(WorldConfig::lazy());
        spawn_shapes(&mut world, &config(2)).unwrap();
        assert!(world.is_registered::<Circle>());
        assert!(world.is_registered::<Rectangle>());
    }
}
