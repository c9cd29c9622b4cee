//! Fixed timestep simulation tick
//!
//! Core loop that advances a level deterministically. Within a tick the
//! phases always run in the same order:
//! input -> integration -> support -> collision -> settle -> outcome.

use glam::Vec2;

use super::integrate::{Integrator, integrate_entities, integrate_projectile, predict_path};
use super::slingshot::{SettleReason, settle_check};
use super::state::{EntityView, Outcome, PointerEvent, ShotPhase, SimEvent, Simulation};
use super::{outcome, support};

impl Simulation {
    /// Pointer pressed at a world position
    pub fn apply_pointer_down(&mut self, pos: Vec2) {
        self.apply_pointer(PointerEvent::Down(pos));
    }

    /// Pointer moved to a world position
    pub fn apply_pointer_drag(&mut self, pos: Vec2) {
        self.apply_pointer(PointerEvent::Drag(pos));
    }

    /// Pointer released
    pub fn apply_pointer_up(&mut self) {
        self.apply_pointer(PointerEvent::Up);
    }

    /// Buffer raw input; it is consumed at the start of the next step
    pub fn apply_pointer(&mut self, event: PointerEvent) {
        self.pending_input.push(event);
    }

    /// Advance the simulation exactly one fixed tick
    pub fn step(&mut self, dt: f32) -> Outcome {
        if self.level.outcome.is_terminal() {
            self.pending_input.clear();
            return self.level.outcome;
        }
        self.time_ticks += 1;

        // Input; a run of drags on a held projectile only needs its last position
        let mut coalesce = false;
        for event in std::mem::take(&mut self.pending_input) {
            let held = self.projectile.as_ref().is_some_and(|p| p.phase == ShotPhase::Dragging);
            let moves_held = held && matches!(event, PointerEvent::Drag(_));
            if coalesce && moves_held {
                self.tape.replace_last(self.time_ticks, event);
            } else {
                self.tape.push(self.time_ticks, event);
            }
            coalesce = moves_held;
            self.handle_pointer(event);
        }

        // Integration
        let integrator = Integrator::new(self.gravity(), &self.tuning);
        integrate_entities(&mut self.entities, &integrator, &self.tuning, dt);
        if let Some(shot) = self.projectile.as_mut() {
            let spec = *self.tuning.projectile(shot.kind);
            integrate_projectile(shot, &spec, &integrator, &self.tuning, dt);
        }

        // Support
        support::resolve_support(&mut self.entities, &self.tuning);

        // Collision; destruction invalidates support immediately
        if self.resolve_collisions() {
            support::resolve_support(&mut self.entities, &self.tuning);
        }

        // Settle, then hand over to the sequencer
        self.settle_projectile(&integrator);

        // Outcome
        let outcome = outcome::evaluate(self);
        if outcome.is_terminal() {
            log::info!(
                "Level '{}' finished: {:?} after {} attempts ({} ticks)",
                self.name,
                outcome,
                self.level.attempts_used,
                self.time_ticks
            );
            self.emit(SimEvent::LevelFinished { outcome });
        }
        self.level.outcome = outcome;
        outcome
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let sling = self.slingshot;
        let Some(shot) = self.projectile.as_mut() else {
            log::trace!("Ignoring {:?}: no projectile", event);
            return;
        };
        let floor = self.tuning.ground_y + shot.radius();
        let applied = match event {
            PointerEvent::Down(pos) => sling.pointer_down(shot, pos, floor),
            PointerEvent::Drag(pos) => sling.pointer_drag(shot, pos, floor),
            PointerEvent::Up => {
                let scale = self.tuning.projectile(shot.kind).launch_scale;
                match sling.pointer_up(shot, scale) {
                    Some(velocity) => {
                        let kind = shot.kind;
                        log::info!("Launched {:?} with velocity ({:.1}, {:.1})", kind, velocity.x, velocity.y);
                        self.emit(SimEvent::Launched { kind, velocity });
                        true
                    }
                    None => false,
                }
            }
        };
        if !applied {
            log::trace!("Ignoring out-of-sequence {:?}", event);
        }
    }

    fn settle_projectile(&mut self, integrator: &Integrator) {
        let Some(shot) = self.projectile.as_ref() else {
            return;
        };
        let on_surface = integrator.on_ground(&shot.body, self.tuning.support_probe) || {
            let probe = shot.body.bounds.probe_below(self.tuning.support_probe);
            self.entities.iter().any(|e| e.is_alive && e.bounds.top() < shot.body.center().y && probe.overlaps(&e.bounds))
        };
        let Some(reason) = settle_check(shot, on_surface, &self.tuning) else {
            return;
        };

        // Explosive kinds go off when they come to rest
        if reason != SettleReason::Spent && self.detonate_projectile() {
            support::resolve_support(&mut self.entities, &self.tuning);
        }

        let Some(shot) = self.projectile.as_mut() else {
            return;
        };
        shot.phase = ShotPhase::Settled;
        shot.body.vel = Vec2::ZERO;
        let kind = shot.kind;
        self.level.attempts_used += 1;
        log::info!(
            "{:?} settled ({:?}), attempt {}/{}",
            kind,
            reason,
            self.level.attempts_used,
            self.level.max_attempts
        );
        self.emit(SimEvent::Settled {
            kind,
            attempt: self.level.attempts_used,
        });

        if self.level.attempts_used < self.level.max_attempts {
            self.advance_sequence();
        }
    }

    /// Read-only views of everything the renderer should draw
    ///
    /// Lazy and restartable: each call walks the current state afresh.
    /// Removed entities and queued projectiles are not included.
    pub fn snapshot_entities(&self) -> impl Iterator<Item = EntityView> + '_ {
        self.entities
            .iter()
            .filter(|e| e.is_alive)
            .map(EntityView::from)
            .chain(
                self.projectile
                    .iter()
                    .filter(|p| p.in_play() || p.body.is_exploded)
                    .map(|p| EntityView::from(&p.body)),
            )
    }

    /// Predicted flight path of the projectile being dragged
    ///
    /// Empty unless a drag is in progress. Does not touch simulation state.
    pub fn preview_trajectory(&self, dt: f32, steps: usize) -> Vec<Vec2> {
        let Some(shot) = self.projectile.as_ref().filter(|p| p.phase == ShotPhase::Dragging) else {
            return Vec::new();
        };
        let spec = self.tuning.projectile(shot.kind);
        let velocity = self.slingshot.launch_velocity(shot.body.center(), spec.launch_scale);
        let integrator = Integrator::new(self.gravity(), &self.tuning);
        predict_path(shot.body.center(), velocity, spec.radius, &integrator, dt, steps)
    }
}
