//! Slingshot input state machine
//!
//! Idle -> Dragging -> Launched -> Settled. The drag position is clamped to
//! `max_drag_radius` around the anchor, so every release is a valid launch and
//! there is no cancel path. A pull toward the ground stops at `floor`, the
//! lowest center height that keeps the projectile above the ground.

use glam::Vec2;

use super::state::{Projectile, ShotPhase, Slingshot};
use crate::clamp_to_radius;
use crate::tuning::Tuning;

/// Why a launched projectile stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    /// Vertical speed under epsilon while resting on ground or a surface
    AtRest,
    /// Left the world's horizontal bounds
    OutOfBounds,
    /// Consumed by its own explosion
    Spent,
    /// Exceeded the flight tick budget
    Timeout,
}

impl Slingshot {
    /// Projectile position for a pointer location while dragging
    pub fn drag_position(&self, pointer: Vec2, floor: f32) -> Vec2 {
        let mut pos = clamp_to_radius(self.anchor, pointer, self.max_drag_radius);
        pos.y = pos.y.max(floor);
        pos
    }

    /// Launch velocity for a release at `pos`
    ///
    /// Releasing exactly on the anchor yields zero velocity.
    pub fn launch_velocity(&self, pos: Vec2, launch_scale: f32) -> Vec2 {
        (self.anchor - pos) * launch_scale
    }

    /// Pointer pressed; starts a drag only on an idle projectile within reach
    ///
    /// Returns false when the event does not apply to the current phase.
    pub fn pointer_down(&self, shot: &mut Projectile, pointer: Vec2, floor: f32) -> bool {
        match shot.phase {
            ShotPhase::Idle if self.anchor.distance(pointer) <= self.max_drag_radius => {
                shot.phase = ShotPhase::Dragging;
                shot.body.bounds.center = self.drag_position(pointer, floor);
                true
            }
            ShotPhase::Dragging => self.pointer_drag(shot, pointer, floor),
            _ => false,
        }
    }

    /// Pointer moved; an idle projectile within reach is picked up as well
    pub fn pointer_drag(&self, shot: &mut Projectile, pointer: Vec2, floor: f32) -> bool {
        match shot.phase {
            ShotPhase::Dragging => {
                shot.body.bounds.center = self.drag_position(pointer, floor);
                true
            }
            ShotPhase::Idle => self.pointer_down(shot, pointer, floor),
            _ => false,
        }
    }

    /// Pointer released; launches a dragged projectile
    ///
    /// Returns the launch velocity, or `None` if nothing was being dragged.
    pub fn pointer_up(&self, shot: &mut Projectile, launch_scale: f32) -> Option<Vec2> {
        if shot.phase != ShotPhase::Dragging {
            return None;
        }
        let velocity = self.launch_velocity(shot.body.center(), launch_scale);
        shot.body.vel = velocity;
        shot.phase = ShotPhase::Launched;
        shot.flight_ticks = 0;
        Some(velocity)
    }
}

/// Decide whether a launched projectile has settled this tick
///
/// `on_surface` is true when the projectile rests on the ground or on top of
/// another entity.
pub fn settle_check(shot: &Projectile, on_surface: bool, tuning: &Tuning) -> Option<SettleReason> {
    if shot.phase != ShotPhase::Launched {
        return None;
    }
    let pos = shot.body.center();
    if shot.spent {
        Some(SettleReason::Spent)
    } else if pos.x < tuning.world_min_x || pos.x > tuning.world_max_x {
        Some(SettleReason::OutOfBounds)
    } else if on_surface && shot.body.vel.y.abs() < tuning.settle_epsilon {
        Some(SettleReason::AtRest)
    } else if shot.flight_ticks >= tuning.max_flight_ticks {
        Some(SettleReason::Timeout)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Rect;
    use crate::sim::state::{Entity, EntityKind, ProjectileKind};
    use proptest::prelude::*;

    fn slingshot() -> Slingshot {
        Slingshot {
            anchor: Vec2::new(200.0, 170.0),
            max_drag_radius: 150.0,
            rest_offset: Vec2::ZERO,
        }
    }

    /// Lowest center for a red bird over the default ground
    const FLOOR: f32 = 65.0;

    fn idle_shot(at: Vec2) -> Projectile {
        Projectile {
            kind: ProjectileKind::Red,
            body: Entity::new(1, EntityKind::Projectile, Rect::around_circle(at, 15.0)),
            phase: ShotPhase::Idle,
            bounces_left: 0,
            flight_ticks: 0,
            hits: Vec::new(),
            spent: false,
        }
    }

    #[test]
    fn test_drag_clamps_and_launches() {
        let sling = slingshot();
        let mut shot = idle_shot(sling.rest_position());

        assert!(sling.pointer_down(&mut shot, Vec2::new(210.0, 170.0), FLOOR));
        assert_eq!(shot.phase, ShotPhase::Dragging);

        assert!(sling.pointer_drag(&mut shot, Vec2::new(600.0, 170.0), FLOOR));
        assert_eq!(shot.body.center(), Vec2::new(350.0, 170.0));

        let scale = 2.0;
        let vel = sling.pointer_up(&mut shot, scale).unwrap();
        assert_eq!(vel, Vec2::new(-150.0 * scale, 0.0));
        assert_eq!(shot.phase, ShotPhase::Launched);
        assert_eq!(shot.body.vel, vel);
    }

    #[test]
    fn test_pointer_down_out_of_reach_is_ignored() {
        let sling = slingshot();
        let mut shot = idle_shot(sling.rest_position());
        assert!(!sling.pointer_down(&mut shot, Vec2::new(900.0, 900.0), FLOOR));
        assert_eq!(shot.phase, ShotPhase::Idle);
    }

    #[test]
    fn test_out_of_sequence_input_is_noop() {
        let sling = slingshot();
        let mut shot = idle_shot(sling.rest_position());
        // Release without drag
        assert!(sling.pointer_up(&mut shot, 5.0).is_none());
        assert_eq!(shot.phase, ShotPhase::Idle);

        shot.phase = ShotPhase::Launched;
        let before = shot.body.center();
        assert!(!sling.pointer_down(&mut shot, Vec2::new(200.0, 170.0), FLOOR));
        assert!(!sling.pointer_drag(&mut shot, Vec2::new(250.0, 170.0), FLOOR));
        assert_eq!(shot.body.center(), before);
    }

    #[test]
    fn test_release_on_anchor_is_no_movement() {
        let sling = slingshot();
        let mut shot = idle_shot(sling.rest_position());
        sling.pointer_down(&mut shot, sling.anchor, FLOOR);
        let vel = sling.pointer_up(&mut shot, 5.0).unwrap();
        assert_eq!(vel, Vec2::ZERO);
        assert!(vel.is_finite());
    }

    #[test]
    fn test_drag_stops_at_floor() {
        let sling = slingshot();
        let mut shot = idle_shot(sling.rest_position());
        sling.pointer_down(&mut shot, sling.anchor, FLOOR);
        assert!(sling.pointer_drag(&mut shot, sling.anchor + Vec2::new(-50.0, -140.0), FLOOR));
        assert_eq!(shot.body.center(), Vec2::new(150.0, FLOOR));

        // Still a full upward launch from the floor
        let vel = sling.pointer_up(&mut shot, 6.0).unwrap();
        assert!(vel.y > 0.0);
        assert_eq!(vel, (sling.anchor - Vec2::new(150.0, FLOOR)) * 6.0);
    }

    #[test]
    fn test_settle_reasons() {
        let tuning = Tuning::default();
        let mut shot = idle_shot(Vec2::new(500.0, 65.0));
        assert_eq!(settle_check(&shot, true, &tuning), None);

        shot.phase = ShotPhase::Launched;
        shot.body.vel = Vec2::new(100.0, 0.0);
        assert_eq!(settle_check(&shot, true, &tuning), Some(SettleReason::AtRest));
        assert_eq!(settle_check(&shot, false, &tuning), None);

        shot.body.bounds.center.x = tuning.world_max_x + 1.0;
        assert_eq!(settle_check(&shot, false, &tuning), Some(SettleReason::OutOfBounds));

        shot.spent = true;
        assert_eq!(settle_check(&shot, false, &tuning), Some(SettleReason::Spent));
    }

    proptest! {
        #[test]
        fn prop_drag_clamp(angle in 0.0f32..std::f32::consts::TAU, dist in 150.5f32..5000.0) {
            let sling = slingshot();
            let pointer = sling.anchor + Vec2::new(angle.cos(), angle.sin()) * dist;
            let pos = sling.drag_position(pointer, f32::MIN);
            let reach = sling.anchor.distance(pos);
            prop_assert!((reach - sling.max_drag_radius).abs() < 1e-3);
            // Same direction as the pointer
            let dir_pointer = (pointer - sling.anchor).normalize();
            let dir_pos = (pos - sling.anchor).normalize();
            prop_assert!(dir_pointer.dot(dir_pos) > 0.9999);
        }

        #[test]
        fn prop_drag_never_below_floor(x in -500.0f32..900.0, y in -500.0f32..900.0) {
            let sling = slingshot();
            let pos = sling.drag_position(Vec2::new(x, y), FLOOR);
            prop_assert!(pos.y >= FLOOR);
            prop_assert!(sling.anchor.distance(pos) <= sling.max_drag_radius + 1e-3);
        }
    }
}
