//! Damage, death and splash resolution.
//!
//! Every hp change in the simulation goes through `apply_damage`, and the
//! transition to dead only happens here, so kill credit and target cleanup
//! run exactly once per death.

use crate::config;
use crate::template::Archetype;
use crate::types::{BattleEvent, DamageKind, DamageOutcome, TickContext, UnitId, Vec2};
use crate::unit::Unit;
use log::info;

/// Applies `amount` damage to `target`.
///
/// Blocked while the target's invulnerability window is open, or when the
/// target is unknown or already dead.
pub fn apply_damage(
    units: &mut [Unit],
    target: UnitId,
    amount: f64,
    source: Option<UnitId>,
    kind: DamageKind,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) -> DamageOutcome {
    let Some(victim) = units.get_mut(target.0).filter(|u| u.id == target) else {
        return DamageOutcome::Blocked;
    };
    if !victim.is_alive() || victim.is_invulnerable() {
        crate::debug_combat!(target, ctx.tick, "Damage {:.1} blocked", amount);
        return DamageOutcome::Blocked;
    }

    victim.hp -= amount;
    victim.damage_taken += amount;
    if victim.has_iframes {
        victim.iframe_timer = config::IFRAME_DURATION;
    }
    let big_hit = amount > victim.max_hp * config::BIG_HIT_FRACTION;
    let position = victim.position;
    let hp_after = victim.hp;
    let lethal = victim.hp <= 0.0;

    crate::debug_combat!(
        target,
        ctx.tick,
        "Took {:.1} {:?} damage from {:?}, hp now {:.1}",
        amount,
        kind,
        source,
        hp_after
    );
    events.push(BattleEvent::DamageApplied {
        target,
        source,
        position,
        amount,
        kind,
        hp_after,
        big_hit,
    });

    if let Some(attacker) = source
        .filter(|s| *s != target)
        .and_then(|s| units.get_mut(s.0).filter(|u| u.id == s))
    {
        attacker.hits += 1;
        attacker.damage_dealt += amount;
    }

    if lethal {
        kill(units, target, source, ctx, events);
        DamageOutcome::Killed
    } else {
        DamageOutcome::Damaged
    }
}

/// Death transition: flags the unit dead, credits the killer and clears
/// every target reference pointing at the corpse.
fn kill(
    units: &mut [Unit],
    victim: UnitId,
    killer: Option<UnitId>,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) {
    let position = units[victim.0].position;
    units[victim.0].mark_dead();

    // Self-kills and posthumous kills earn nothing
    let credited = killer.filter(|k| {
        *k != victim && units.get(k.0).is_some_and(|u| u.id == *k && u.is_alive())
    });
    if let Some(k) = credited {
        units[k.0].kills += 1;
    }

    for unit in units.iter_mut() {
        if unit.target == Some(victim) {
            unit.target = None;
        }
    }

    info!(
        target: "combat",
        "[T{:05}] {} (U{}) died{}",
        ctx.tick,
        units[victim.0].name,
        victim,
        match credited {
            Some(k) => format!(", killed by {} (U{})", units[k.0].name, k),
            None => String::new(),
        }
    );
    events.push(BattleEvent::UnitDied {
        unit: victim,
        killer: credited,
        position,
    });
}

/// Damages every live unit within `radius` of `center`, the source included.
/// Each unit's own invulnerability still applies.
pub fn apply_area_damage(
    units: &mut [Unit],
    center: Vec2,
    radius: f64,
    damage: f64,
    source: Option<UnitId>,
    kind: DamageKind,
    ctx: &TickContext,
    events: &mut Vec<BattleEvent>,
) -> Vec<(UnitId, DamageOutcome)> {
    let victims: Vec<UnitId> = units
        .iter()
        .filter(|u| u.is_alive() && u.position.distance(&center) <= radius)
        .map(|u| u.id)
        .collect();

    victims
        .into_iter()
        .map(|id| (id, apply_damage(units, id, damage, source, kind, ctx, events)))
        .collect()
}

/// Contact damage from body-archetype units overlapping other live units.
/// Each attacker hits everything it touches, then waits out its contact timer.
pub fn resolve_body_contacts(units: &mut [Unit], ctx: &TickContext, events: &mut Vec<BattleEvent>) {
    for i in 0..units.len() {
        let attacker = &units[i];
        if !attacker.is_alive()
            || attacker.archetype != Archetype::Body
            || attacker.body_damage <= 0.0
            || attacker.contact_timer > 0.0
        {
            continue;
        }

        let attacker_id = attacker.id;
        let damage = attacker.body_damage;
        let touching: Vec<(UnitId, Vec2)> = units
            .iter()
            .filter(|other| other.id != attacker_id && other.is_alive() && attacker.overlaps(other))
            .map(|other| {
                let normal = (other.position - attacker.position)
                    .normalized()
                    .unwrap_or_else(|| attacker.facing());
                (other.id, normal)
            })
            .collect();

        if touching.is_empty() {
            continue;
        }
        for (victim, normal) in touching {
            crate::debug_combat!(attacker_id, ctx.tick, "Body slam on U{}", victim);
            let outcome = apply_damage(units, victim, damage, Some(attacker_id), DamageKind::Physical, ctx, events);
            // Corpses stay where they fell
            if outcome != DamageOutcome::Killed {
                units[victim.0].velocity += normal * config::CONTACT_KNOCKBACK;
            }
        }
        units[i].contact_timer = config::CONTACT_DAMAGE_INTERVAL;
    }
}
