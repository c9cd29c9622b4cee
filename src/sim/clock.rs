//! Fixed-step frame clock
//!
//! Converts variable frame durations into whole simulation ticks. Leftover
//! time carries over to the next frame; long frames are capped so a stall
//! never turns into a burst of catch-up ticks.

use serde::{Deserialize, Serialize};

use super::state::{Outcome, Simulation};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame duration fed into the accumulator
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStepClock {
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStepClock {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Unconsumed time carried into the next frame
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Add a frame's elapsed time; returns how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == self.max_substeps && self.accumulator >= self.dt {
            log::trace!("Dropping {:.4}s of frame time", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Step `sim` for one rendered frame
    pub fn drive(&mut self, sim: &mut Simulation, frame_dt: f32) -> Outcome {
        let mut outcome = sim.outcome();
        for _ in 0..self.advance(frame_dt) {
            outcome = sim.step(self.dt);
            if outcome.is_terminal() {
                self.reset();
                break;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelLayout;
    use crate::tuning::Tuning;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert!(clock.pending() > 0.0 && clock.pending() < SIM_DT);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(10.0), MAX_SUBSTEPS);
        assert!(clock.pending() < SIM_DT);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_drive_steps_simulation() {
        let layout = LevelLayout::builtin(0).unwrap();
        let mut sim = Simulation::new(&layout, Tuning::default()).unwrap();
        let mut clock = FixedStepClock::default();
        for _ in 0..10 {
            clock.drive(&mut sim, SIM_DT * 2.0);
        }
        assert_eq!(sim.time_ticks, 20);
    }
}
