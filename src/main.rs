//! Virus Strike headless runner
//!
//! Plays levels with the autopilot through the fixed-step accumulator and
//! prints the final session snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use clap::Parser;
    use virus_strike::ConfigBundle;
    use virus_strike::consts::{MAX_SUBSTEPS, SIM_DT};
    use virus_strike::sim::{GameEvent, LevelOutcome, Playfield, TickInput, World};

    #[derive(Parser, Debug)]
    #[command(name = "virus-strike")]
    #[command(version)]
    #[command(about = "Headless autopilot runner for the Virus Strike combat core", long_about = None)]
    pub struct Args {
        /// Level to start on (unknown ids fall back to the first level)
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// RNG seed for the first attempt
        #[arg(short, long, default_value = "12345")]
        seed: u64,

        /// Maximum simulation ticks per attempt
        #[arg(short, long, default_value = "36000")]
        ticks: u32,

        /// ConfigBundle JSON replacing the built-in campaign
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Continue to the next level after a clear
        #[arg(long, default_value = "false")]
        campaign: bool,

        /// Retries allowed per level after a failure
        #[arg(long, default_value = "0")]
        retries: u32,

        /// Frame length fed to the accumulator, in milliseconds
        #[arg(long, default_value = "16.667")]
        frame_ms: f32,

        /// Print a snapshot for every attempt instead of only the last one
        #[arg(long, default_value = "false")]
        all: bool,
    }

    fn load_bundle(path: Option<&PathBuf>) -> Result<ConfigBundle, String> {
        let Some(path) = path else {
            return Ok(ConfigBundle::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {}", path.display(), e))
    }

    /// Run one attempt until it ends or the tick budget runs out; returns ticks used
    fn play(world: &mut World, max_ticks: u32, frame_dt: f32) -> u32 {
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut accumulator = 0.0;
        let mut ticks = 0;

        while ticks < max_ticks && !world.session().is_over() {
            accumulator += frame_dt;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && ticks < max_ticks {
                world.tick(&input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
                ticks += 1;
            }
            for event in world.drain_events() {
                log_event(&event);
            }
        }
        ticks
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Hit { kind, combo, .. } => log::trace!("Hit {:?} (combo {})", kind, combo),
            GameEvent::SuperNeedleGranted { total } => log::debug!("Super needle ready ({})", total),
            GameEvent::PhaseTriggered { target, phase } => {
                log::debug!("Target {} entered phase {}", target, phase)
            }
            GameEvent::LevelCleared { level_id } => log::info!("Level {} cleared", level_id),
            GameEvent::LevelFailed {
                level_id,
                carried_gauge,
            } => log::info!("Level {} failed (gauge {:.3} carried)", level_id, carried_gauge),
            GameEvent::Drops { .. } | GameEvent::NeedleFired { .. } => {}
        }
    }

    pub fn run(args: Args) -> Result<(), String> {
        let bundle = load_bundle(args.config.as_ref())?;
        let frame_dt = (args.frame_ms / 1000.0).clamp(SIM_DT, 0.1);
        let mut seed = args.seed;
        let mut world = World::new(&bundle, args.level, seed, Playfield::default())
            .map_err(|e| e.to_string())?;
        let mut retries_left = args.retries;
        let mut played = Vec::new();

        loop {
            let ticks = play(&mut world, args.ticks, frame_dt);
            log::info!(
                "Level {} finished as {:?} after {} ticks",
                world.level_id(),
                world.session().outcome(),
                ticks
            );
            played.push(world.snapshot());

            seed = seed.wrapping_add(1);
            match world.session().outcome() {
                LevelOutcome::Failed if retries_left > 0 => {
                    retries_left -= 1;
                    world = world.retry(seed).map_err(|e| e.to_string())?;
                }
                LevelOutcome::Cleared if args.campaign => {
                    match world.next_level(seed).map_err(|e| e.to_string())? {
                        Some(next) => {
                            world = next;
                            retries_left = args.retries;
                        }
                        None => break,
                    }
                }
                _ => break,
            }
        }

        let json = if args.all {
            serde_json::to_string_pretty(&played)
        } else {
            serde_json::to_string_pretty(&world.snapshot())
        }
        .map_err(|e| e.to_string())?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = runner::Args::parse();
    log::info!("Virus Strike (headless) starting...");

    if let Err(e) = runner::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is embedded as a library on the web; there is no wasm runner
}
