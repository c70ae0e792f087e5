use crate::arena::Arena;
use crate::config;
use crate::types::{BattleEvent, TickContext, Vec2};
use crate::unit::Unit;

/// Moves a unit by its velocity, resolves wall contact and applies friction.
///
/// Wall contact clamps the body inside the arena and reflects the
/// perpendicular velocity component, damped by `arena.bounce`. Impacts are
/// reported only when the body was actually moving, so resting units do not
/// spam effects.
pub fn integrate(unit: &mut Unit, arena: &Arena, ctx: &TickContext, events: &mut Vec<BattleEvent>) {
    let scaled_dt = ctx.scaled_dt();
    unit.position += unit.velocity * scaled_dt;
    unit.rotation += config::ROTATION_SPEED * scaled_dt;

    let r = unit.radius;
    let impact_speed = unit.velocity.x.abs() + unit.velocity.y.abs();

    let mut normals: Vec<Vec2> = Vec::new();
    if unit.position.x < r {
        unit.position.x = r;
        unit.velocity.x = unit.velocity.x.abs() * arena.bounce;
        normals.push(Vec2::new(-1.0, 0.0));
    }
    if unit.position.x > arena.width - r {
        unit.position.x = arena.width - r;
        unit.velocity.x = -unit.velocity.x.abs() * arena.bounce;
        normals.push(Vec2::new(1.0, 0.0));
    }
    if unit.position.y < r {
        unit.position.y = r;
        unit.velocity.y = unit.velocity.y.abs() * arena.bounce;
        normals.push(Vec2::new(0.0, -1.0));
    }
    if unit.position.y > arena.height - r {
        unit.position.y = arena.height - r;
        unit.velocity.y = -unit.velocity.y.abs() * arena.bounce;
        normals.push(Vec2::new(0.0, 1.0));
    }

    if impact_speed > config::WALL_IMPACT_MIN_SPEED {
        for normal in normals {
            crate::debug_physics!(
                unit.id,
                ctx.tick,
                "Wall impact at ({:.1}, {:.1}) speed {:.2}",
                unit.position.x,
                unit.position.y,
                impact_speed
            );
            events.push(BattleEvent::WallImpact {
                unit: unit.id,
                position: unit.position + normal * r,
                normal,
                speed: impact_speed,
            });
        }
    }

    apply_friction(&mut unit.velocity, arena.friction);
}

/// Scales velocity by the friction coefficient and snaps tiny components to zero
pub fn apply_friction(velocity: &mut Vec2, friction: f64) {
    velocity.x *= friction;
    velocity.y *= friction;
    if velocity.x.abs() < config::MIN_VELOCITY {
        velocity.x = 0.0;
    }
    if velocity.y.abs() < config::MIN_VELOCITY {
        velocity.y = 0.0;
    }
}

/// Clamps a velocity's magnitude to `max_speed`
pub fn clamp_speed(velocity: &mut Vec2, max_speed: f64) {
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        *velocity = *velocity * (max_speed / speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Archetype, UnitTemplate};
    use crate::types::UnitId;
    use assert_approx_eq::assert_approx_eq;

    fn test_unit(position: Vec2, velocity: Vec2) -> Unit {
        let template = UnitTemplate {
            radius: 10.0,
            ..UnitTemplate::new("Dummy", Archetype::Melee)
        };
        let mut unit = Unit::new(UnitId(0), &template, position);
        unit.velocity = velocity;
        unit
    }

    #[test]
    fn test_free_movement_and_friction() {
        let arena = Arena::new(400.0, 400.0).unwrap();
        let mut unit = test_unit(Vec2::new(100.0, 100.0), Vec2::new(3.0, -2.0));
        let mut events = Vec::new();
        integrate(&mut unit, &arena, &TickContext::new(0, 1.0, 1.0), &mut events);

        assert_approx_eq!(unit.position.x, 103.0);
        assert_approx_eq!(unit.position.y, 98.0);
        assert_approx_eq!(unit.velocity.x, 3.0 * 0.98);
        assert_approx_eq!(unit.velocity.y, -2.0 * 0.98);
        assert_approx_eq!(unit.rotation, config::ROTATION_SPEED);
        assert!(events.is_empty());
    }

    #[test]
    fn test_time_scale_scales_displacement() {
        let arena = Arena::new(400.0, 400.0).unwrap();
        let mut unit = test_unit(Vec2::new(100.0, 100.0), Vec2::new(4.0, 0.0));
        integrate(&mut unit, &arena, &TickContext::new(0, 1.0, 0.25), &mut Vec::new());
        assert_approx_eq!(unit.position.x, 101.0);
    }

    #[test]
    fn test_wall_bounce_reflects_and_damps() {
        let arena = Arena::new(400.0, 400.0).unwrap();
        let mut unit = test_unit(Vec2::new(392.0, 200.0), Vec2::new(5.0, 0.0));
        let mut events = Vec::new();
        integrate(&mut unit, &arena, &TickContext::new(0, 1.0, 1.0), &mut events);

        assert_approx_eq!(unit.position.x, 390.0);
        assert_approx_eq!(unit.velocity.x, -5.0 * 0.8 * 0.98);
        assert_eq!(events.len(), 1);
        match &events[0] {
            BattleEvent::WallImpact { normal, speed, .. } => {
                assert_eq!(*normal, Vec2::new(1.0, 0.0));
                assert_approx_eq!(*speed, 5.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_slow_wall_contact_is_silent() {
        let arena = Arena::new(400.0, 400.0).unwrap();
        let mut unit = test_unit(Vec2::new(11.0, 200.0), Vec2::new(-1.5, 0.0));
        let mut events = Vec::new();
        integrate(&mut unit, &arena, &TickContext::new(0, 1.0, 1.0), &mut events);
        assert_approx_eq!(unit.position.x, 10.0);
        assert!(unit.velocity.x > 0.0);
        assert!(events.is_empty(), "resting bodies should not emit impacts");
    }

    #[test]
    fn test_corner_hit_reports_both_walls() {
        let arena = Arena::new(400.0, 400.0).unwrap();
        let mut unit = test_unit(Vec2::new(12.0, 12.0), Vec2::new(-4.0, -4.0));
        let mut events = Vec::new();
        integrate(&mut unit, &arena, &TickContext::new(0, 1.0, 1.0), &mut events);
        assert_eq!(events.len(), 2);
        assert!(unit.velocity.x > 0.0 && unit.velocity.y > 0.0);
    }

    #[test]
    fn test_small_velocity_snaps_to_zero() {
        let mut velocity = Vec2::new(0.1, -0.05);
        apply_friction(&mut velocity, 0.98);
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn test_clamp_speed() {
        let mut velocity = Vec2::new(30.0, 40.0);
        clamp_speed(&mut velocity, 10.0);
        assert_approx_eq!(velocity.length(), 10.0);
        assert_approx_eq!(velocity.x, 6.0);

        let mut slow = Vec2::new(1.0, 1.0);
        clamp_speed(&mut slow, 10.0);
        assert_eq!(slow, Vec2::new(1.0, 1.0));
    }
}
