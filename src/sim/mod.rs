//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod geom;
pub mod integrate;
pub mod outcome;
pub mod replay;
pub mod sequencer;
pub mod slingshot;
pub mod state;
pub mod support;
pub mod tick;

pub use clock::FixedStepClock;
pub use collision::{explode, projectile_hits};
pub use geom::Rect;
pub use integrate::{Integrator, predict_path};
pub use replay::{InputTape, replay};
pub use sequencer::ProjectileQueue;
pub use slingshot::{SettleReason, settle_check};
pub use state::{
    Entity, EntityId, EntityKind, EntityView, LevelState, Outcome, PointerEvent, Projectile,
    ProjectileKind, RngState, ShotPhase, SimEvent, Simulation, Slingshot, VisualFlag,
};
