//! Simulation state and core entity types
//!
//! All state that must be reproduced for replay/determinism lives here. The
//! `Simulation` exclusively owns every entity; components borrow it for the
//! duration of one tick phase.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::replay::InputTape;
use super::sequencer::ProjectileQueue;
use super::{outcome, support};
use crate::error::LayoutError;
use crate::level::{LevelLayout, TargetKind, WinCondition};
use crate::tuning::Tuning;

/// Stable entity identifier, allocated in construction order
pub type EntityId = u32;

/// Entity tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Pig,
    Crate,
    Glass,
    Projectile,
    ExplosiveProjectile,
}

impl EntityKind {
    pub fn is_projectile(self) -> bool {
        matches!(self, EntityKind::Projectile | EntityKind::ExplosiveProjectile)
    }
}

impl From<TargetKind> for EntityKind {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Pig => EntityKind::Pig,
            TargetKind::Crate => EntityKind::Crate,
            TargetKind::Glass => EntityKind::Glass,
        }
    }
}

/// Queued projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Normal bird, bounces once
    #[default]
    Red,
    /// Fast bird
    Yellow,
    /// Explodes on hit or on settling
    Black,
}

/// What the renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualFlag {
    Intact,
    Hurt,
    /// Knocked loose (crate/glass in motion or toppling)
    Struck,
    Exploded,
}

/// A physically simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Rect,
    pub vel: Vec2,
    /// Recomputed every tick by the support resolver
    pub is_supported: bool,
    pub is_alive: bool,
    pub is_hurt: bool,
    pub is_exploded: bool,
    /// Knocked loose by an impulse; ignored by support until it comes to rest
    pub struck: bool,
    /// Hits taken (pigs)
    pub hits: u8,
    /// Toppling angle in degrees (glass only, 0 = upright)
    pub tilt_angle: f32,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, bounds: Rect) -> Self {
        Self {
            id,
            kind,
            bounds,
            vel: Vec2::ZERO,
            is_supported: false,
            is_alive: true,
            is_hurt: false,
            is_exploded: false,
            struck: false,
            hits: 0,
            tilt_angle: 0.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds.center
    }

    /// Mark hurt; returns false if already hurt or removed
    pub fn hurt(&mut self) -> bool {
        if !self.is_alive || self.is_hurt {
            return false;
        }
        self.is_hurt = true;
        true
    }

    /// Remove from play; returns false if already removed
    pub fn remove(&mut self) -> bool {
        if !self.is_alive {
            return false;
        }
        self.is_alive = false;
        self.is_supported = false;
        self.vel = Vec2::ZERO;
        true
    }

    /// Flag an explosion; returns false if already exploded
    pub fn explode(&mut self) -> bool {
        if self.is_exploded {
            return false;
        }
        self.is_exploded = true;
        true
    }

    /// Glass between its first strike and lying flat
    pub fn is_tilting(&self) -> bool {
        self.kind == EntityKind::Glass && self.tilt_angle > 0.0 && self.tilt_angle < 90.0
    }

    pub fn visual(&self) -> VisualFlag {
        if self.is_exploded {
            VisualFlag::Exploded
        } else if self.is_hurt {
            VisualFlag::Hurt
        } else if self.struck || self.tilt_angle > 0.0 {
            VisualFlag::Struck
        } else {
            VisualFlag::Intact
        }
    }
}

/// Sub-state of the projectile currently on the slingshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// Resting at the slingshot, waiting for input
    Idle,
    /// Being pulled back
    Dragging,
    /// In flight, handed to the integrator
    Launched,
    /// Came to rest; the sequencer takes over
    Settled,
}

/// The one active projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub body: Entity,
    pub phase: ShotPhase,
    pub bounces_left: u32,
    pub flight_ticks: u32,
    /// Targets already hit during this flight
    pub hits: Vec<EntityId>,
    /// Consumed by its own explosion
    pub spent: bool,
}

impl Projectile {
    pub fn radius(&self) -> f32 {
        self.body.bounds.half.x
    }

    pub fn in_play(&self) -> bool {
        self.phase != ShotPhase::Settled
    }
}

/// Fixed slingshot geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slingshot {
    pub anchor: Vec2,
    pub max_drag_radius: f32,
    /// Idle projectile position relative to the anchor
    pub rest_offset: Vec2,
}

impl Slingshot {
    pub fn rest_position(&self) -> Vec2 {
        self.anchor + self.rest_offset
    }
}

/// Level result classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Continue,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Continue
    }
}

/// Attempt bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub attempts_used: u32,
    pub max_attempts: u32,
    pub outcome: Outcome,
}

/// Raw pointer input in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Drag(Vec2),
    Up,
}

/// Notifications for the UI layer, drained after each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Launched {
        kind: ProjectileKind,
        velocity: Vec2,
    },
    PigHurt {
        id: EntityId,
    },
    PigRemoved {
        id: EntityId,
    },
    Struck {
        id: EntityId,
        impulse: Vec2,
    },
    Knocked {
        from: EntityId,
        to: EntityId,
    },
    Exploded {
        at: Vec2,
        radius: f32,
        removed: Vec<EntityId>,
    },
    Settled {
        kind: ProjectileKind,
        attempt: u32,
    },
    NextProjectile {
        kind: ProjectileKind,
    },
    OutOfProjectiles,
    LevelFinished {
        outcome: Outcome,
    },
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Rect,
    pub visual: VisualFlag,
    pub tilt_angle: f32,
}

impl From<&Entity> for EntityView {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            bounds: e.bounds,
            visual: e.visual(),
            tilt_angle: e.tilt_angle,
        }
    }
}

/// RNG state wrapper for serialization
///
/// Each draw reseeds from `seed + draws`, so the stream survives a
/// serialize/deserialize round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Uniform draw in [min, max]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        let mut rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.draws));
        self.draws += 1;
        if max <= min {
            return min;
        }
        rng.random_range(min..=max)
    }
}

/// Complete level simulation (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub name: String,
    pub tuning: Tuning,
    pub gravity_scale: f32,
    pub win_condition: WinCondition,
    pub slingshot: Slingshot,
    /// Targets, sorted by id
    pub entities: Vec<Entity>,
    /// Projectile on the slingshot or in flight
    pub projectile: Option<Projectile>,
    pub queue: ProjectileQueue,
    pub level: LevelState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rng_state: RngState,
    /// Inputs consumed so far, keyed by tick
    pub tape: InputTape,
    /// Pointer input buffered until the next step
    pub(crate) pending_input: Vec<PointerEvent>,
    #[serde(skip)]
    pub(crate) events: Vec<SimEvent>,
    next_id: EntityId,
}

impl Simulation {
    /// Build a level from its layout; fails before any tick runs
    pub fn new(layout: &LevelLayout, tuning: Tuning) -> Result<Self, LayoutError> {
        let resolved = layout.resolve(tuning.ground_y)?;

        let mut sim = Self {
            name: layout.name.clone(),
            tuning,
            gravity_scale: layout.gravity_scale,
            win_condition: layout.win_condition,
            slingshot: Slingshot {
                anchor: layout.slingshot.anchor,
                max_drag_radius: layout.slingshot.max_drag_radius,
                rest_offset: layout.slingshot.rest_offset,
            },
            entities: Vec::with_capacity(resolved.len()),
            projectile: None,
            queue: ProjectileQueue::new(&layout.projectiles),
            level: LevelState {
                attempts_used: 0,
                max_attempts: layout.max_attempts,
                outcome: Outcome::Continue,
            },
            time_ticks: 0,
            rng_state: RngState::new(layout.seed),
            tape: InputTape::default(),
            pending_input: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        for (kind, bounds) in resolved {
            let id = sim.next_entity_id();
            sim.entities.push(Entity::new(id, kind.into(), bounds));
        }

        // Stacked layouts start at rest
        support::resolve_support(&mut sim.entities, &sim.tuning);
        sim.load_next_projectile();
        sim.level.outcome = outcome::evaluate(&sim);

        log::info!(
            "Level '{}' loaded: {} entities, {} projectiles, {} attempts",
            sim.name,
            sim.entities.len(),
            layout.projectiles.len(),
            sim.level.max_attempts
        );
        Ok(sim)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Downward gravity vector after the level's scale
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(0.0, -self.tuning.gravity * self.gravity_scale)
    }

    pub fn outcome(&self) -> Outcome {
        self.level.outcome
    }

    /// Live pigs (not hurt, not removed)
    pub fn pigs_standing(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Pig && e.is_alive && !e.is_hurt)
            .count()
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}
