//! Collision & destruction
//!
//! Two hit tests share one contract:
//! - containment: projectile center inside a pig's bounds hurts the pig
//! - distance: projectile center within `impact_radius` of a crate or glass
//!   center hands it a fraction of the projectile's velocity
//!
//! Explosions are a separate radius pass that removes every target whose
//! center lies within the blast, regardless of the hit tests. All state
//! changes are one-way; repeated destruction of a dead entity is a no-op.

use glam::Vec2;

use super::state::{Entity, EntityId, EntityKind, RngState, ShotPhase, SimEvent, Simulation};
use crate::tuning::Tuning;

/// Does a projectile centered at `center` hit `target`?
pub fn projectile_hits(center: Vec2, target: &Entity, tuning: &Tuning) -> bool {
    match target.kind {
        EntityKind::Pig => target.bounds.contains_point(center),
        EntityKind::Crate | EntityKind::Glass => center.distance(target.center()) <= tuning.impact_radius,
        EntityKind::Projectile | EntityKind::ExplosiveProjectile => false,
    }
}

/// Register a hit on a pig; returns true if the pig was removed
fn hit_pig(pig: &mut Entity, tuning: &Tuning, events: &mut Vec<SimEvent>) -> bool {
    if !pig.is_alive {
        return false;
    }
    pig.hits = pig.hits.saturating_add(1);
    if pig.hurt() {
        log::debug!("Pig {} hurt", pig.id);
        events.push(SimEvent::PigHurt { id: pig.id });
    }
    if pig.hits >= tuning.pig_hits_to_remove && pig.remove() {
        log::debug!("Pig {} removed after {} hits", pig.id, pig.hits);
        events.push(SimEvent::PigRemoved { id: pig.id });
        return true;
    }
    false
}

/// Hand an impulse to a crate or glass slab, knocking it loose
fn strike(target: &mut Entity, impulse: Vec2, tuning: &Tuning, rng: &mut RngState, events: &mut Vec<SimEvent>) {
    target.vel += impulse;
    target.struck = true;
    target.is_supported = false;
    if target.kind == EntityKind::Glass && target.tilt_angle == 0.0 {
        target.tilt_angle = rng
            .range(tuning.glass_tilt_seed_min, tuning.glass_tilt_seed_max)
            .max(f32::EPSILON);
    }
    log::debug!("{:?} {} struck, impulse {:?}", target.kind, target.id, impulse);
    events.push(SimEvent::Struck { id: target.id, impulse });
}

/// Remove every target whose center is within `radius` of `at`
pub fn explode(entities: &mut [Entity], at: Vec2, radius: f32, events: &mut Vec<SimEvent>) -> Vec<EntityId> {
    let removed: Vec<EntityId> = entities
        .iter_mut()
        .filter(|e| !e.kind.is_projectile() && e.center().distance(at) <= radius)
        .filter_map(|e| e.remove().then_some(e.id))
        .collect();
    log::info!("Explosion at ({:.1}, {:.1}) r={} removed {:?}", at.x, at.y, radius, removed);
    events.push(SimEvent::Exploded {
        at,
        radius,
        removed: removed.clone(),
    });
    removed
}

impl Simulation {
    /// Collision phase of a tick; returns true if any entity was removed
    pub(crate) fn resolve_collisions(&mut self) -> bool {
        let mut removed_any = self.projectile_vs_targets();
        removed_any |= self.entity_knocks();
        removed_any
    }

    /// Detonate the active projectile if it is explosive and not yet spent
    ///
    /// Returns true if anything was removed.
    pub(crate) fn detonate_projectile(&mut self) -> bool {
        let Simulation {
            projectile,
            entities,
            tuning,
            events,
            ..
        } = self;
        let Some(shot) = projectile.as_mut() else {
            return false;
        };
        let Some(radius) = tuning.projectile(shot.kind).explosion_radius else {
            return false;
        };
        if !shot.body.explode() {
            return false;
        }
        shot.spent = true;
        !explode(entities, shot.body.center(), radius, events).is_empty()
    }

    fn projectile_vs_targets(&mut self) -> bool {
        let Simulation {
            projectile,
            entities,
            tuning,
            rng_state,
            events,
            ..
        } = self;
        let Some(shot) = projectile.as_mut() else {
            return false;
        };
        if shot.phase != ShotPhase::Launched || shot.spent {
            return false;
        }

        let spec = *tuning.projectile(shot.kind);
        let center = shot.body.center();
        let mut removed_any = false;

        for i in 0..entities.len() {
            let target = &entities[i];
            if !target.is_alive || shot.hits.contains(&target.id) || !projectile_hits(center, target, tuning) {
                continue;
            }
            shot.hits.push(target.id);

            if let Some(radius) = spec.explosion_radius {
                shot.body.explode();
                shot.spent = true;
                removed_any |= !explode(entities, center, radius, events).is_empty();
                break;
            }

            let target = &mut entities[i];
            if target.kind == EntityKind::Pig {
                removed_any |= hit_pig(target, tuning, events);
            } else {
                strike(target, shot.body.vel * tuning.impulse_fraction, tuning, rng_state, events);
            }
        }
        removed_any
    }

    /// Moving struck entities pass part of their velocity to resting ones they overlap
    fn entity_knocks(&mut self) -> bool {
        let Simulation {
            entities,
            tuning,
            rng_state,
            events,
            ..
        } = self;

        let mut pairs = Vec::new();
        for (i, mover) in entities.iter().enumerate() {
            if !mover.is_alive || !mover.struck || mover.vel.length() < tuning.knock_speed {
                continue;
            }
            for (j, target) in entities.iter().enumerate() {
                if i != j && target.is_alive && !target.struck && mover.bounds.overlaps(&target.bounds) {
                    pairs.push((i, j));
                }
            }
        }

        let mut removed_any = false;
        for (i, j) in pairs {
            let mover_vel = entities[i].vel;
            if mover_vel.length() < tuning.knock_speed || entities[j].struck || !entities[j].is_alive {
                continue;
            }
            let transfer = mover_vel * tuning.impulse_fraction;
            entities[i].vel -= transfer;

            let (from, to) = (entities[i].id, entities[j].id);
            let target = &mut entities[j];
            if target.kind == EntityKind::Pig {
                removed_any |= hit_pig(target, tuning, events);
            } else {
                strike(target, transfer, tuning, rng_state, events);
            }
            events.push(SimEvent::Knocked { from, to });
        }
        removed_any
    }
}
