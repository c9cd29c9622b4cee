//! Slingshot - a projectile puzzle simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (launch, integration, stacking, destruction, outcome)
//! - `level`: Static level layouts and validation
//! - `tuning`: Data-driven game balance
//! - `progress`: Level unlock flags
//!
//! Rendering, audio and screen navigation live outside this crate. They drive
//! [`sim::Simulation::step`] from a frame clock and read back snapshots and events.

pub mod error;
pub mod level;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use error::{LayoutError, ProgressError};
pub use level::{EntitySpec, LevelLayout, SlingshotSpec, WinCondition};
pub use progress::LevelProgress;
pub use sim::{Outcome, Simulation};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Default ground height in world units (y grows upward)
    pub const GROUND_Y: f32 = 50.0;
    /// Default slingshot anchor
    pub const SLINGSHOT_ANCHOR: (f32, f32) = (200.0, 170.0);
    /// Default maximum pull distance
    pub const MAX_DRAG_RADIUS: f32 = 150.0;

    /// Depth of the probe band below an entity used for support detection
    pub const SUPPORT_PROBE: f32 = 1.0;
}

/// Unit direction from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_or_zero(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp `point` to lie within `radius` of `anchor`, keeping its direction
///
/// A point already inside the radius is returned unchanged.
#[inline]
pub fn clamp_to_radius(anchor: Vec2, point: Vec2, radius: f32) -> Vec2 {
    let dist = anchor.distance(point);
    if dist <= radius {
        point
    } else {
        anchor + direction_or_zero(anchor, point) * radius
    }
}
