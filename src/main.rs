//! Golf2D headless driver
//!
//! Plays every level with the seeded auto-aimer and logs what happens.
//! Usage: `golf2d [seed] [name]`. With a name, the finished run is appended
//! to `scores.txt` and the leaderboard is printed.

use std::path::Path;

use golf2d::autoplay::AutoAimer;
use golf2d::consts::TICK_MS;
use golf2d::highscores::{self, Leaderboard};
use golf2d::session::{LevelOutcome, Session};
use golf2d::settings::Settings;
use golf2d::sim::{ShotResult, SimEvent, Simulator, compute_velocity};

/// Skip a level after this many shots
const MAX_SHOTS_PER_LEVEL: u32 = 200;
/// A shot still moving after this many ticks is a physics bug
const MAX_TICKS_PER_SHOT: u32 = 50_000;

const SETTINGS_PATH: &str = "settings.json";
const SCORES_PATH: &str = "scores.txt";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2022);
    let name = args.next();

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    let mut session = Session::from_settings(&settings);
    let mut aimer = AutoAimer::new(seed);
    let mut sim = Simulator::new(session.level());
    log::info!("Ball colour {}, seed {}", settings.ball_colour, seed);

    while !session.is_finished() {
        if session.shots() >= MAX_SHOTS_PER_LEVEL {
            log::warn!("Stuck on level {}, skipping it", session.level());
            if let LevelOutcome::Advanced(next) = session.skip_level() {
                sim.load_level(next, None);
            }
            continue;
        }
        let Some(origin) = sim.rest_spot() else {
            break;
        };

        let target = aimer.next_target(origin, sim.geometry(), session.max_power());
        let velocity = compute_velocity(origin, target, session.max_power());
        if !sim.fire(velocity) {
            break;
        }
        session.record_shot();

        let Some(result) = play_shot(&mut sim) else {
            log::error!("Shot never settled on level {}", session.level());
            break;
        };

        if result == ShotResult::Holed {
            match session.complete_level() {
                LevelOutcome::Advanced(next) => sim.load_level(next, None),
                LevelOutcome::Finished { total_shots } => {
                    log::info!("Course finished in {total_shots} shots");
                }
            }
        }
    }

    if let Some(name) = name {
        if let Err(e) = record_run(&session, &name) {
            log::error!("Could not record run: {e}");
        }
    }
}

/// Drive the simulator at the tick rate until the shot ends
fn play_shot(sim: &mut Simulator) -> Option<ShotResult> {
    for _ in 0..MAX_TICKS_PER_SHOT {
        let result = sim.advance(TICK_MS);
        for event in sim.drain_events() {
            match event {
                SimEvent::Rested(spot) => log::debug!("Rested at ({:.1}, {:.1})", spot.x, spot.y),
                SimEvent::Holed => log::debug!("In the hole"),
                SimEvent::PositionChanged(_) | SimEvent::SlitMoved { .. } => {}
            }
        }
        if result.is_terminal() {
            return Some(result);
        }
    }
    None
}

fn record_run(session: &Session, name: &str) -> Result<(), highscores::ScoreError> {
    let path = Path::new(SCORES_PATH);
    highscores::append_record(path, &session.save_record(name))?;

    let board = Leaderboard::from_records(&highscores::load_records(path)?);
    if board.is_empty() {
        println!("No completed runs yet");
    }
    for (rank, entry) in board.entries.iter().enumerate() {
        println!("{:>2}. {:<20} {}", rank + 1, entry.name, entry.score);
    }
    Ok(())
}
