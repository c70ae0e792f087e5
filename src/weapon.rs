use crate::combat;
use crate::config;
use crate::projectile::{ProjectileLaunch, ProjectileSystem};
use crate::template::WeaponKind;
use crate::types::{BattleEvent, DamageKind, DamageOutcome, ProjectileId, TickContext, UnitId, Vec2};
use crate::unit::Unit;

/// What happened when a unit tried to attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireResult {
    NotReady,
    Swing { hit: Option<UnitId> },
    Launched(Option<ProjectileId>),
}

/// Fires the weapon of the unit at `index` if it is alive, armed and off cooldown.
/// Melee resolves immediately; projectiles are handed to `projectiles`.
pub fn try_fire(
    units: &mut [Unit],
    index: usize,
    projectiles: &mut ProjectileSystem,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) -> FireResult {
    let attacker = &units[index];
    if !attacker.is_alive() || attacker.cooldown > 0.0 || !attacker.weapon.fires() {
        return FireResult::NotReady;
    }

    let cooldown = attacker.weapon.cooldown();
    units[index].cooldown = cooldown;

    match units[index].weapon.kind {
        WeaponKind::Melee => FireResult::Swing {
            hit: melee_attack(units, index, ctx, events),
        },
        WeaponKind::Projectile => FireResult::Launched(launch_projectile(
            &units[index],
            units,
            projectiles,
            ctx,
            events,
        )),
        WeaponKind::None | WeaponKind::Body => FireResult::NotReady,
    }
}

/// Picks the unit struck by a swing landing at `point`: the live non-attacker
/// whose padded body contains the point and lies closest to it. Exact ties go
/// to the first unit in iteration order.
pub fn melee_target(units: &[Unit], attacker: UnitId, point: Vec2) -> Option<UnitId> {
    let mut best: Option<(UnitId, f64)> = None;
    for target in units {
        if target.id == attacker || !target.is_alive() {
            continue;
        }
        let distance = point.distance(&target.position);
        if distance >= target.radius + config::MELEE_HIT_MARGIN {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((target.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

fn melee_attack(
    units: &mut [Unit],
    index: usize,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) -> Option<UnitId> {
    let attacker = &units[index];
    let attacker_id = attacker.id;
    let angle = attacker.rotation;
    let reach = attacker.weapon.melee_reach();
    let damage = attacker.weapon.damage();
    let direction = attacker.facing();
    let point = attacker.position + direction * (attacker.radius + reach);

    let hit = melee_target(units, attacker_id, point);
    events.push(BattleEvent::MeleeSwing {
        attacker: attacker_id,
        position: point,
        angle,
        range: reach,
        hit,
    });

    if let Some(target) = hit {
        crate::debug_weapon!(attacker_id, ctx.tick, "Melee swing hits U{} for {:.1}", target, damage);
        let outcome = combat::apply_damage(units, target, damage, Some(attacker_id), DamageKind::Physical, ctx, events);
        if outcome != DamageOutcome::Killed {
            units[target.0].velocity += direction * config::MELEE_KNOCKBACK;
        }
    } else {
        crate::debug_weapon!(attacker_id, ctx.tick, "Melee swing misses");
    }
    hit
}

fn launch_projectile(
    attacker: &Unit,
    units: &[Unit],
    projectiles: &mut ProjectileSystem,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) -> Option<ProjectileId> {
    // Aim at the live target when there is one, otherwise shoot along the facing
    let aim = crate::ai::resolve_target(attacker, units)
        .and_then(|id| crate::ai::find_unit(units, id))
        .and_then(|target| (target.position - attacker.position).normalized())
        .unwrap_or_else(|| attacker.facing());

    let template = attacker.weapon.projectile_template();
    let launch = ProjectileLaunch {
        owner: attacker.id,
        position: attacker.position + aim * (attacker.radius + config::MUZZLE_OFFSET),
        direction: aim,
        damage: attacker.weapon.projectile_damage(),
        kind: attacker.damage_kind(),
    };

    let id = projectiles.spawn(launch, &template);
    match id {
        Some(id) => {
            let projectile = projectiles.get(id)?;
            crate::debug_weapon!(
                attacker.id,
                ctx.tick,
                "Launched {} at ({:.1}, {:.1}) heading {:.2}",
                id,
                projectile.position.x,
                projectile.position.y,
                aim.angle()
            );
            events.push(BattleEvent::ProjectileSpawned {
                projectile: id,
                owner: attacker.id,
                position: projectile.position,
                velocity: projectile.velocity,
            });
        }
        None => {
            log::warn!(
                target: "weapon",
                "Projectile cap reached; U{} shot dropped",
                attacker.id
            );
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{self, Archetype, UnitTemplate, WeaponTemplate};
    use assert_approx_eq::assert_approx_eq;

    fn ctx() -> TickContext {
        TickContext::new(0, 1.0, 1.0)
    }

    fn dummy(id: usize, x: f64, y: f64, radius: f64, hp: f64) -> Unit {
        let template = UnitTemplate {
            radius,
            hp,
            max_hp: Some(hp),
            ..UnitTemplate::new("Dummy", Archetype::Melee)
        };
        Unit::new(UnitId(id), &template, Vec2::new(x, y))
    }

    fn swordsman_at(id: usize, x: f64, y: f64) -> Unit {
        let template = template::builtin("swordsman").unwrap();
        Unit::new(UnitId(id), &template, Vec2::new(x, y))
    }

    #[test]
    fn test_melee_hit_applies_damage_and_knockback() {
        // Swing lands 16 + 35 = 51 ahead; a radius-20 target 30 away contains it
        let mut units = vec![swordsman_at(0, 100.0, 100.0), dummy(1, 130.0, 100.0, 20.0, 300.0)];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();

        let result = try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        assert_eq!(result, FireResult::Swing { hit: Some(UnitId(1)) });
        assert_approx_eq!(units[1].hp, 275.0);
        assert_approx_eq!(units[1].velocity.x, config::MELEE_KNOCKBACK);
        assert_approx_eq!(units[1].velocity.y, 0.0);
        assert_approx_eq!(units[0].cooldown, 20.0);
        assert!(projectiles.is_empty());
        assert!(matches!(events[0], BattleEvent::MeleeSwing { hit: Some(UnitId(1)), .. }));
    }

    #[test]
    fn test_lethal_melee_hit_leaves_corpse_in_place() {
        let mut units = vec![swordsman_at(0, 100.0, 100.0), dummy(1, 130.0, 100.0, 20.0, 10.0)];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();

        try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        assert!(!units[1].is_alive());
        assert_eq!(units[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_cooldown_blocks_second_attack() {
        let mut units = vec![swordsman_at(0, 100.0, 100.0), dummy(1, 130.0, 100.0, 20.0, 300.0)];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();
        try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        let second = try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        assert_eq!(second, FireResult::NotReady);
        assert_approx_eq!(units[1].hp, 275.0);
    }

    #[test]
    fn test_melee_miss_still_costs_cooldown() {
        let mut units = vec![swordsman_at(0, 100.0, 100.0), dummy(1, 300.0, 300.0, 20.0, 300.0)];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();
        let result = try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        assert_eq!(result, FireResult::Swing { hit: None });
        assert!(units[0].cooldown > 0.0);
        assert_approx_eq!(units[1].hp, 300.0);
    }

    #[test]
    fn test_melee_is_single_target_nearest_to_swing() {
        // Swing point is at x = 151. Both targets contain it; unit 2 is closer.
        let mut units = vec![
            swordsman_at(0, 100.0, 100.0),
            dummy(1, 135.0, 100.0, 20.0, 100.0),
            dummy(2, 150.0, 100.0, 20.0, 100.0),
        ];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();
        try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        assert_approx_eq!(units[1].hp, 100.0);
        assert_approx_eq!(units[2].hp, 75.0);
    }

    #[test]
    fn test_unarmed_and_dead_units_do_not_fire() {
        let mut units = vec![dummy(0, 100.0, 100.0, 10.0, 50.0), dummy(1, 120.0, 100.0, 10.0, 50.0)];
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();
        assert_eq!(
            try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events),
            FireResult::NotReady
        );

        let berserker = template::builtin("berserker").unwrap();
        units[0] = Unit::new(UnitId(0), &berserker, Vec2::new(100.0, 100.0));
        assert_eq!(
            try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events),
            FireResult::NotReady
        );

        units[1] = swordsman_at(1, 120.0, 100.0);
        units[1].mark_dead();
        assert_eq!(
            try_fire(&mut units, 1, &mut projectiles, &ctx(), &mut events),
            FireResult::NotReady
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_aims_at_target() {
        let archer = template::builtin("archer").unwrap();
        let mut units = vec![
            Unit::new(UnitId(0), &archer, Vec2::new(100.0, 100.0)),
            dummy(1, 100.0, 300.0, 12.0, 100.0),
        ];
        units[0].target = Some(UnitId(1));
        units[0].rotation = 0.0; // Facing east, target is south
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();

        let result = try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        let FireResult::Launched(Some(id)) = result else {
            panic!("expected a launch, got {:?}", result);
        };
        let projectile = projectiles.get(id).unwrap();
        assert_approx_eq!(projectile.velocity.x, 0.0);
        assert_approx_eq!(projectile.velocity.y, 12.0);
        assert_approx_eq!(projectile.position.y, 100.0 + 12.0 + config::MUZZLE_OFFSET);
        assert_approx_eq!(projectile.damage, 15.0);
        assert_approx_eq!(units[0].cooldown, 25.0);
        assert!(matches!(events[0], BattleEvent::ProjectileSpawned { owner: UnitId(0), .. }));
    }

    #[test]
    fn test_projectile_without_target_follows_facing() {
        let template = UnitTemplate {
            weapon: WeaponTemplate {
                kind: WeaponKind::Projectile,
                damage: None,
                cooldown: None,
                range: None,
                projectile: None,
            },
            ..UnitTemplate::new("Slinger", Archetype::Ranged)
        };
        let mut units = vec![Unit::new(UnitId(0), &template, Vec2::new(50.0, 50.0))];
        units[0].rotation = std::f64::consts::PI;
        let mut projectiles = ProjectileSystem::new();
        let mut events = Vec::new();

        try_fire(&mut units, 0, &mut projectiles, &ctx(), &mut events);
        let projectile = projectiles.iter().next().unwrap();
        assert_approx_eq!(projectile.velocity.x, -config::DEFAULT_PROJECTILE_SPEED);
        assert_approx_eq!(projectile.damage, config::DEFAULT_WEAPON_DAMAGE);
        assert_approx_eq!(units[0].cooldown, config::PROJECTILE_COOLDOWN);
    }
}
