//! Slingshot headless demo
//!
//! Plays a level without a renderer: aims every queued projectile at the
//! nearest pig, steps the simulation at the fixed rate and logs what
//! happens.
//!
//! Usage: `slingshot [LEVEL_NUMBER | LAYOUT.json] [PROGRESS.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host on the web; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use glam::Vec2;
    use slingshot::consts::SIM_DT;
    use slingshot::sim::{EntityKind, FixedStepClock, Integrator, ShotPhase, SimEvent, predict_path};
    use slingshot::{LevelLayout, LevelProgress, Outcome, Simulation, Tuning};

    /// Frames to wait for a shot to settle before giving up on the run
    const MAX_FRAMES_PER_SHOT: u32 = 3000;
    const PREVIEW_STEPS: usize = 600;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let (layout, level_index) = load_layout(args.next().as_deref())?;
        let progress_path = args.next();

        let mut sim = Simulation::new(&layout, Tuning::default())?;
        let mut clock = FixedStepClock::default();
        log::info!("Playing '{}' with {} attempts", sim.name, sim.level.max_attempts);

        while !sim.outcome().is_terminal() {
            let Some(pull) = aim(&sim) else {
                log::warn!("No pig left to aim at");
                break;
            };
            let anchor = sim.slingshot.anchor;
            sim.apply_pointer_down(anchor);
            sim.apply_pointer_drag(anchor + pull);
            sim.apply_pointer_up();

            let attempts = sim.level.attempts_used;
            let mut frames = 0;
            while sim.level.attempts_used == attempts && !sim.outcome().is_terminal() {
                clock.drive(&mut sim, SIM_DT);
                for event in sim.drain_events() {
                    report(&event);
                }
                frames += 1;
                if frames > MAX_FRAMES_PER_SHOT {
                    return Err("shot never settled".into());
                }
            }
        }

        for view in sim.snapshot_entities() {
            log::debug!("{:?} {} at {:?} ({:?})", view.kind, view.id, view.bounds.center, view.visual);
        }
        println!(
            "{}: {:?} after {} of {} attempts, {} pigs standing, {} ticks",
            sim.name,
            sim.outcome(),
            sim.level.attempts_used,
            sim.level.max_attempts,
            sim.pigs_standing(),
            sim.time_ticks
        );

        if let (Some(path), Some(index)) = (progress_path, level_index) {
            let path = Path::new(&path);
            let mut progress = LevelProgress::load(path, LevelLayout::builtin_count())?;
            if progress.record_outcome(index, sim.outcome()) {
                println!("Unlocked level {}", index + 2);
            }
            progress.save(path)?;
        }
        Ok(())
    }

    /// Built-in level number (1-based) or a path to a JSON layout
    fn load_layout(arg: Option<&str>) -> Result<(LevelLayout, Option<usize>), Box<dyn std::error::Error>> {
        let arg = arg.unwrap_or("1");
        if let Ok(number) = arg.parse::<usize>() {
            let index = number.checked_sub(1).ok_or("levels are numbered from 1")?;
            let layout = LevelLayout::builtin(index).ok_or_else(|| format!("no built-in level {number}"))?;
            return Ok((layout, Some(index)));
        }
        let json = std::fs::read_to_string(arg)?;
        Ok((LevelLayout::from_json(&json)?, None))
    }

    /// Full-length pull whose predicted path passes closest to a standing pig
    fn aim(sim: &Simulation) -> Option<Vec2> {
        let shot = sim.projectile.as_ref().filter(|p| p.phase == ShotPhase::Idle)?;
        let target = sim
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Pig && e.is_alive)
            .min_by(|a, b| {
                a.is_hurt
                    .cmp(&b.is_hurt)
                    .then(a.center().x.total_cmp(&b.center().x))
            })
            .map(|e| e.center())?;

        let spec = sim.tuning.projectile(shot.kind);
        let integrator = Integrator::new(sim.gravity(), &sim.tuning);
        let sling = sim.slingshot;
        let floor = sim.tuning.ground_y + spec.radius;

        (0..=60)
            .map(|i| {
                // Pull back and down, from flat to steep
                let angle = std::f32::consts::PI + (i as f32) * 1.5f32.to_radians();
                Vec2::new(angle.cos(), angle.sin()) * sling.max_drag_radius
            })
            .map(|pull| {
                let start = sling.drag_position(sling.anchor + pull, floor);
                let velocity = sling.launch_velocity(start, spec.launch_scale);
                let path = predict_path(start, velocity, spec.radius, &integrator, SIM_DT, PREVIEW_STEPS);
                let miss = path.iter().map(|p| p.distance(target)).fold(f32::INFINITY, f32::min);
                (pull, miss)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(pull, _)| pull)
    }

    fn report(event: &SimEvent) {
        match event {
            SimEvent::LevelFinished { outcome: Outcome::Won } => println!("Level cleared!"),
            SimEvent::LevelFinished { outcome } => println!("Level over: {outcome:?}"),
            SimEvent::PigHurt { id } => println!("Pig {id} hurt"),
            SimEvent::PigRemoved { id } => println!("Pig {id} removed"),
            other => log::info!("{other:?}"),
        }
    }
}
