//! Multi-projectile sequencer
//!
//! Holds the level's ordered projectile queue and swaps in the next kind once
//! the active projectile settles. New kinds plug in through the tuning table;
//! nothing here switches on a kind directly.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{Entity, EntityKind, Projectile, ProjectileKind, ShotPhase, SimEvent, Simulation};

/// Projectile kinds still waiting for the slingshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectileQueue {
    pending: VecDeque<ProjectileKind>,
}

impl ProjectileQueue {
    pub fn new(kinds: &[ProjectileKind]) -> Self {
        Self {
            pending: kinds.iter().copied().collect(),
        }
    }

    pub fn pop(&mut self) -> Option<ProjectileKind> {
        self.pending.pop_front()
    }

    pub fn peek(&self) -> Option<ProjectileKind> {
        self.pending.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Simulation {
    /// Put the next queued kind on the slingshot with fresh physics state
    ///
    /// Returns false when the queue is exhausted; the active slot is then empty.
    pub fn load_next_projectile(&mut self) -> bool {
        let Some(kind) = self.queue.pop() else {
            self.projectile = None;
            return false;
        };

        let spec = *self.tuning.projectile(kind);
        let entity_kind = if spec.is_explosive() {
            EntityKind::ExplosiveProjectile
        } else {
            EntityKind::Projectile
        };
        let id = self.next_entity_id();
        let bounds = Rect::around_circle(self.slingshot.rest_position(), spec.radius);

        self.projectile = Some(Projectile {
            kind,
            body: Entity::new(id, entity_kind, bounds),
            phase: ShotPhase::Idle,
            bounces_left: spec.bounces,
            flight_ticks: 0,
            hits: Vec::new(),
            spent: false,
        });
        log::debug!(
            "Projectile {:?} loaded ({} left in queue, next {:?})",
            kind,
            self.queue.remaining(),
            self.queue.peek()
        );
        true
    }

    /// Called after a settle: move on to the next projectile or report exhaustion
    pub(crate) fn advance_sequence(&mut self) {
        if self.load_next_projectile() {
            if let Some(shot) = &self.projectile {
                let kind = shot.kind;
                self.emit(SimEvent::NextProjectile { kind });
            }
        } else {
            log::info!("Out of projectiles after {} attempts", self.level.attempts_used);
            self.emit(SimEvent::OutOfProjectiles);
        }
    }
}
