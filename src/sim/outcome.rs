//! Level outcome evaluator
//!
//! Pure function of simulation state: reads pig flags, attempts and the
//! projectile slot, never mutates anything. Win is checked before loss, so a
//! last-shot clear still counts.

use super::state::{EntityKind, Outcome, Simulation};
use crate::level::WinCondition;

/// Classify the current state
pub fn evaluate(sim: &Simulation) -> Outcome {
    let mut pigs = sim.entities.iter().filter(|e| e.kind == EntityKind::Pig);

    let won = match sim.win_condition {
        WinCondition::AllPigsDown => pigs.all(|p| !p.is_alive || p.is_hurt),
        WinCondition::AllPigsRemoved => pigs.all(|p| !p.is_alive),
        WinCondition::FirstPigHit => pigs.any(|p| !p.is_alive || p.is_hurt),
    };
    if won {
        return Outcome::Won;
    }

    let out_of_projectiles = !sim.projectile.as_ref().is_some_and(|p| p.in_play());
    if out_of_projectiles || sim.level.attempts_used >= sim.level.max_attempts {
        return Outcome::Lost;
    }
    Outcome::Continue
}
