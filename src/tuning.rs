//! Data-driven game balance
//!
//! Every physics constant the simulation consults lives here, so levels and
//! tests can swap values without touching the tick code. Missing JSON fields
//! fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ProjectileKind;

/// Per-kind projectile constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Launch speed multiplier applied to the pull vector
    pub launch_scale: f32,
    /// Collision radius
    pub radius: f32,
    /// Area-destruction radius; `None` for non-explosive kinds
    pub explosion_radius: Option<f32>,
    /// Ground bounces before the projectile can settle
    pub bounces: u32,
    /// Vertical speed kept on each bounce (0-1)
    pub restitution: f32,
}

impl ProjectileSpec {
    pub fn is_explosive(&self) -> bool {
        self.explosion_radius.is_some()
    }
}

/// The projectile kind table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTable {
    pub red: ProjectileSpec,
    pub yellow: ProjectileSpec,
    pub black: ProjectileSpec,
}

impl Default for ProjectileTable {
    fn default() -> Self {
        Self {
            red: ProjectileSpec {
                launch_scale: 6.0,
                radius: 15.0,
                explosion_radius: None,
                bounces: 1,
                restitution: 0.4,
            },
            yellow: ProjectileSpec {
                launch_scale: 8.0,
                radius: 13.0,
                explosion_radius: None,
                bounces: 0,
                restitution: 0.0,
            },
            black: ProjectileSpec {
                launch_scale: 6.0,
                radius: 18.0,
                explosion_radius: Some(120.0),
                bounces: 0,
                restitution: 0.0,
            },
        }
    }
}

impl ProjectileTable {
    pub fn get(&self, kind: ProjectileKind) -> &ProjectileSpec {
        match kind {
            ProjectileKind::Red => &self.red,
            ProjectileKind::Yellow => &self.yellow,
            ProjectileKind::Black => &self.black,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integration ===
    /// Downward acceleration magnitude (units/s²), scaled per level
    pub gravity: f32,
    /// Per-tick velocity multiplier in (0, 1]
    pub damping: f32,
    /// Impenetrable floor height
    pub ground_y: f32,
    /// Horizontal velocity multiplier for struck entities touching the ground
    pub ground_friction: f32,
    /// Projectiles leaving [min_x, max_x] settle immediately
    pub world_min_x: f32,
    pub world_max_x: f32,

    // === Support ===
    /// Depth of the probe band under each entity
    pub support_probe: f32,

    // === Settling ===
    /// Speed below which a projectile or struck entity counts as at rest
    pub settle_epsilon: f32,
    /// Forced settle after this many ticks of flight
    pub max_flight_ticks: u32,

    // === Collision ===
    /// Center distance for projectile impulse hits on crates and glass
    pub impact_radius: f32,
    /// Fraction of the striker's velocity handed to the target
    pub impulse_fraction: f32,
    /// Minimum speed for a struck entity to knock into others
    pub knock_speed: f32,
    /// Hits that remove a pig outright (first hit only hurts)
    pub pig_hits_to_remove: u8,

    // === Glass toppling ===
    /// Initial tilt range in degrees, drawn when glass is first struck
    pub glass_tilt_seed_min: f32,
    pub glass_tilt_seed_max: f32,
    /// Tilt ramp speed (degrees/s)
    pub glass_tilt_rate: f32,
    /// Horizontal slide while tilting (units/s)
    pub glass_slide_speed: f32,

    /// Projectile kind constants
    pub projectiles: ProjectileTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 600.0,
            damping: 0.999,
            ground_y: GROUND_Y,
            ground_friction: 0.9,
            world_min_x: -200.0,
            world_max_x: 2400.0,

            support_probe: SUPPORT_PROBE,

            settle_epsilon: 1.0,
            max_flight_ticks: 20 * 60,

            impact_radius: 40.0,
            impulse_fraction: 0.5,
            knock_speed: 60.0,
            pig_hits_to_remove: 2,

            glass_tilt_seed_min: 5.0,
            glass_tilt_seed_max: 15.0,
            glass_tilt_rate: 90.0,
            glass_slide_speed: 40.0,

            projectiles: ProjectileTable::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: gravity={} damping={} ground_y={}",
            tuning.gravity,
            tuning.damping,
            tuning.ground_y
        );
        Ok(tuning)
    }

    /// Constants for a projectile kind
    pub fn projectile(&self, kind: ProjectileKind) -> &ProjectileSpec {
        self.projectiles.get(kind)
    }
}
