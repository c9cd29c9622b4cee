//! Gravity/damping integrator
//!
//! Semi-implicit Euler with a fixed `dt`:
//! velocity += gravity * dt, velocity *= damping, position += velocity * dt,
//! then clamp against the ground. Same inputs give bit-identical output.

use glam::Vec2;

use super::state::{Entity, EntityKind, Projectile, ShotPhase};
use crate::tuning::{ProjectileSpec, Tuning};

/// Integration constants for one level
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub gravity: Vec2,
    pub damping: f32,
    pub ground_y: f32,
}

impl Integrator {
    pub fn new(gravity: Vec2, tuning: &Tuning) -> Self {
        Self {
            gravity,
            damping: tuning.damping,
            ground_y: tuning.ground_y,
        }
    }

    /// Advance one body a single step
    ///
    /// Returns the vertical velocity at impact if the body hit the ground.
    pub fn advance(&self, body: &mut Entity, dt: f32) -> Option<f32> {
        body.vel += self.gravity * dt;
        body.vel *= self.damping;
        body.bounds.center += body.vel * dt;
        self.clamp_to_ground(body)
    }

    /// Vertical-only step, used for toppling glass
    pub fn advance_vertical(&self, body: &mut Entity, dt: f32) -> Option<f32> {
        body.vel.y += self.gravity.y * dt;
        body.vel.y *= self.damping;
        body.bounds.center.y += body.vel.y * dt;
        self.clamp_to_ground(body)
    }

    /// Push a body back above the ground
    ///
    /// Only downward velocity counts as an impact and is zeroed; a body
    /// already moving up keeps its velocity.
    pub fn clamp_to_ground(&self, body: &mut Entity) -> Option<f32> {
        if body.bounds.bottom() >= self.ground_y {
            return None;
        }
        body.bounds.set_bottom(self.ground_y);
        if body.vel.y > 0.0 {
            return None;
        }
        let impact = body.vel.y;
        body.vel.y = 0.0;
        Some(impact)
    }

    /// Bottom edge touches the ground (within `slack`)
    pub fn on_ground(&self, body: &Entity, slack: f32) -> bool {
        body.bounds.bottom() <= self.ground_y + slack
    }
}

/// Advance every free target entity
///
/// Supported and removed entities are skipped. Struck glass topples: its tilt
/// ramps toward 90° while it slides sideways in the direction of its velocity.
pub fn integrate_entities(entities: &mut [Entity], integrator: &Integrator, tuning: &Tuning, dt: f32) {
    for e in entities.iter_mut().filter(|e| e.is_alive && !e.is_supported) {
        if e.is_tilting() {
            e.tilt_angle = (e.tilt_angle + tuning.glass_tilt_rate * dt).min(90.0);
            if e.vel.x != 0.0 {
                e.bounds.center.x += e.vel.x.signum() * tuning.glass_slide_speed * dt;
            }
            integrator.advance_vertical(e, dt);
            if e.tilt_angle >= 90.0 {
                log::debug!("Glass {} toppled", e.id);
                e.vel.x = 0.0;
            }
        } else {
            let landed = integrator.advance(e, dt).is_some();
            if landed && e.struck {
                e.vel.x *= tuning.ground_friction;
            }
        }
    }
}

/// Advance the projectile while it is in flight
///
/// A projectile with bounces left reflects off the ground with its kind's
/// restitution instead of stopping.
pub fn integrate_projectile(shot: &mut Projectile, spec: &ProjectileSpec, integrator: &Integrator, tuning: &Tuning, dt: f32) {
    if shot.phase != ShotPhase::Launched || shot.spent {
        return;
    }
    shot.flight_ticks += 1;
    if let Some(impact) = integrator.advance(&mut shot.body, dt) {
        let rebound = -impact * spec.restitution;
        if shot.bounces_left > 0 && rebound >= tuning.settle_epsilon {
            shot.bounces_left -= 1;
            shot.body.vel.y = rebound;
            log::debug!("Projectile bounced, {} bounces left", shot.bounces_left);
        }
    }
}

/// Predict the path of a launch without touching the simulation
pub fn predict_path(start: Vec2, velocity: Vec2, radius: f32, integrator: &Integrator, dt: f32, steps: usize) -> Vec<Vec2> {
    let mut probe = Entity::new(0, EntityKind::Projectile, super::geom::Rect::around_circle(start, radius));
    probe.vel = velocity;
    let mut path = Vec::with_capacity(steps);
    for _ in 0..steps {
        let landed = integrator.advance(&mut probe, dt).is_some();
        path.push(probe.center());
        if landed {
            break;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::geom::Rect;
    use crate::sim::state::ProjectileKind;
    use proptest::prelude::*;

    fn integrator() -> Integrator {
        Integrator::new(Vec2::new(0.0, -600.0), &Tuning::default())
    }

    fn crate_at(x: f32, y: f32) -> Entity {
        Entity::new(1, EntityKind::Crate, Rect::from_bottom_left(x, y, 50.0, 50.0))
    }

    fn launched(vel: Vec2, spec: &ProjectileSpec) -> Projectile {
        let mut body = Entity::new(9, EntityKind::Projectile, Rect::around_circle(Vec2::new(200.0, 170.0), spec.radius));
        body.vel = vel;
        Projectile {
            kind: ProjectileKind::Red,
            body,
            phase: ShotPhase::Launched,
            bounces_left: spec.bounces,
            flight_ticks: 0,
            hits: Vec::new(),
            spent: false,
        }
    }

    #[test]
    fn test_single_step_matches_formula() {
        let integ = integrator();
        let mut e = crate_at(0.0, 300.0);
        let start = e.center();
        e.vel = Vec2::new(10.0, 0.0);
        integ.advance(&mut e, SIM_DT);

        let expected_vel = (Vec2::new(10.0, 0.0) + Vec2::new(0.0, -600.0) * SIM_DT) * integ.damping;
        assert_eq!(e.vel, expected_vel);
        assert_eq!(e.center(), start + expected_vel * SIM_DT);
    }

    #[test]
    fn test_ground_clamp() {
        let integ = integrator();
        let mut e = crate_at(0.0, 51.0);
        e.vel = Vec2::new(0.0, -500.0);
        let impact = integ.advance(&mut e, SIM_DT);
        assert!(impact.unwrap() < 0.0);
        assert_eq!(e.bounds.bottom(), integ.ground_y);
        assert_eq!(e.vel.y, 0.0);
    }

    #[test]
    fn test_ground_clamp_keeps_upward_velocity() {
        let integ = integrator();
        let mut e = crate_at(0.0, 10.0);
        e.vel = Vec2::new(30.0, 800.0);
        assert!(integ.clamp_to_ground(&mut e).is_none());
        assert_eq!(e.bounds.bottom(), integ.ground_y);
        assert_eq!(e.vel, Vec2::new(30.0, 800.0));
    }

    #[test]
    fn test_supported_entities_are_skipped() {
        let integ = integrator();
        let tuning = Tuning::default();
        let mut entities = vec![crate_at(0.0, 200.0)];
        entities[0].is_supported = true;
        let before = entities[0].center();
        integrate_entities(&mut entities, &integ, &tuning, SIM_DT);
        assert_eq!(entities[0].center(), before);
        assert_eq!(entities[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_glass_topples_and_slides() {
        let integ = integrator();
        let tuning = Tuning::default();
        let mut glass = Entity::new(3, EntityKind::Glass, Rect::from_bottom_left(100.0, 50.0, 20.0, 80.0));
        glass.tilt_angle = 10.0;
        glass.struck = true;
        glass.vel = Vec2::new(-200.0, 0.0);
        let mut entities = vec![glass];
        let x0 = entities[0].center().x;

        integrate_entities(&mut entities, &integ, &tuning, SIM_DT);
        let g = &entities[0];
        assert!(g.tilt_angle > 10.0);
        let slide = tuning.glass_slide_speed * SIM_DT;
        assert!((g.center().x - (x0 - slide)).abs() < 1e-4);

        for _ in 0..120 {
            integrate_entities(&mut entities, &integ, &tuning, SIM_DT);
        }
        assert_eq!(entities[0].tilt_angle, 90.0);
        assert_eq!(entities[0].vel.x, 0.0);
        assert!(entities[0].bounds.bottom() >= integ.ground_y);
    }

    #[test]
    fn test_projectile_bounce_consumed() {
        let integ = integrator();
        let tuning = Tuning::default();
        let spec = *tuning.projectile(ProjectileKind::Red);
        assert_eq!(spec.bounces, 1);
        let mut shot = launched(Vec2::new(50.0, -400.0), &spec);
        shot.body.bounds.set_bottom(integ.ground_y + 1.0);

        integrate_projectile(&mut shot, &spec, &integ, &tuning, SIM_DT);
        assert_eq!(shot.bounces_left, 0);
        assert!(shot.body.vel.y > 0.0);

        // Fall back down; no bounces left so it stops on the ground
        for _ in 0..600 {
            integrate_projectile(&mut shot, &spec, &integ, &tuning, SIM_DT);
            if shot.body.vel.y == 0.0 && integ.on_ground(&shot.body, 0.0) {
                break;
            }
        }
        assert_eq!(shot.body.vel.y, 0.0);
        assert_eq!(shot.body.bounds.bottom(), integ.ground_y);
    }

    #[test]
    fn test_predict_path_ends_on_ground() {
        let integ = integrator();
        let path = predict_path(Vec2::new(200.0, 170.0), Vec2::new(300.0, 300.0), 15.0, &integ, SIM_DT, 1000);
        assert!(path.len() < 1000);
        let last = path.last().unwrap();
        assert!((last.y - (integ.ground_y + 15.0)).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_trajectory_is_deterministic(vx in -900.0f32..900.0, vy in -900.0f32..900.0, steps in 1usize..400) {
            let integ = integrator();
            let run = || {
                let mut e = crate_at(300.0, 400.0);
                e.vel = Vec2::new(vx, vy);
                let mut trace = Vec::with_capacity(steps);
                for _ in 0..steps {
                    integ.advance(&mut e, SIM_DT);
                    trace.push((e.center().x.to_bits(), e.center().y.to_bits()));
                }
                trace
            };
            prop_assert_eq!(run(), run());
        }

        #[test]
        fn prop_never_below_ground(vx in -900.0f32..900.0, vy in -2000.0f32..900.0, steps in 1usize..300) {
            let integ = integrator();
            let mut e = crate_at(300.0, 60.0);
            e.vel = Vec2::new(vx, vy);
            for _ in 0..steps {
                integ.advance(&mut e, SIM_DT);
                prop_assert!(e.bounds.bottom() >= integ.ground_y - 1e-3);
            }
        }
    }
}
