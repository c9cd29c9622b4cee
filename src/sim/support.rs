//! Support & stacking resolver
//!
//! An entity is supported when a thin probe band under its bottom edge
//! overlaps another live entity whose top lies below the entity's center.
//! The first match in id order wins. Recomputed every tick, so an entity
//! whose supporter disappears simply starts falling again.

use super::state::Entity;
use crate::tuning::Tuning;

/// Index of the first entity holding up `entities[i]`, if any
fn find_supporter(entities: &[Entity], i: usize, probe_depth: f32) -> Option<usize> {
    let e = &entities[i];
    let probe = e.bounds.probe_below(probe_depth);
    entities.iter().enumerate().position(|(j, other)| {
        j != i
            && other.is_alive
            && !other.kind.is_projectile()
            && other.bounds.top() < e.center().y
            && probe.overlaps(&other.bounds)
    })
}

/// Reclassify support for every target entity
///
/// Supported entities lose their vertical velocity and are lifted back onto
/// the supporter's top if they sank into it. Struck entities land on surfaces
/// but stay detached until their speed drops below the settle epsilon.
pub fn resolve_support(entities: &mut [Entity], tuning: &Tuning) {
    for i in 0..entities.len() {
        if !entities[i].is_alive || entities[i].kind.is_projectile() {
            entities[i].is_supported = false;
            continue;
        }

        let supporter_top = find_supporter(entities, i, tuning.support_probe).map(|j| entities[j].bounds.top());
        let e = &mut entities[i];
        let was_supported = e.is_supported;

        match supporter_top {
            Some(top) if !e.struck => {
                e.is_supported = true;
                e.vel.y = 0.0;
                if e.bounds.bottom() < top {
                    e.bounds.set_bottom(top);
                }
            }
            Some(top) => {
                e.is_supported = false;
                if e.vel.y <= 0.0 {
                    if e.bounds.bottom() < top {
                        e.bounds.set_bottom(top);
                    }
                    e.vel.y = 0.0;
                    e.vel.x *= tuning.ground_friction;
                }
            }
            None => e.is_supported = false,
        }

        if e.struck && !e.is_tilting() && e.vel.length() < tuning.settle_epsilon {
            let resting = supporter_top.is_some() || e.bounds.bottom() <= tuning.ground_y + tuning.support_probe;
            if resting {
                log::debug!("Entity {} came to rest", e.id);
                e.struck = false;
                e.vel = glam::Vec2::ZERO;
                e.is_supported = supporter_top.is_some();
            }
        }

        if was_supported != e.is_supported {
            log::debug!("Entity {} supported: {} -> {}", e.id, was_supported, e.is_supported);
        }
    }
}
