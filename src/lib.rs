//! Golf2D - ball physics for a three-level 2D mini-golf game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, collisions, rest/hole detection)
//! - `session`: Shot counting, level progression, power cheat
//! - `highscores`: Save records and leaderboard
//! - `settings`: Player preferences
//! - `autoplay`: Seeded auto-aimer for attract mode
//!
//! Screen coordinates throughout: origin top-left, y grows downward.

pub mod autoplay;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, ScoreRecord};
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
///
/// These are the tuned values the game feel depends on. Changing any of them
/// changes how every shot plays out.
pub mod consts {
    /// World width (px)
    pub const WORLD_WIDTH: f64 = 1366.0;
    /// World height (px)
    pub const WORLD_HEIGHT: f64 = 768.0;
    /// Floor line; the ball's bottom edge never rests below this
    pub const FLOOR_Y: f64 = 720.0;

    /// Ball radius
    pub const BALL_RADIUS: f64 = 15.0;
    pub const BALL_DIAMETER: f64 = 2.0 * BALL_RADIUS;
    /// Where the ball starts on every level (left edge, bottom edge)
    pub const LEVEL_ORIGIN: (f64, f64) = (5.0, FLOOR_Y);

    /// Ball tick period in milliseconds
    pub const TICK_MS: u32 = 12;
    /// Tick period in seconds, used for gravity
    pub const TICK_SECS: f64 = 0.012;
    /// Slit step period in milliseconds (level 3)
    pub const SLIT_TICK_MS: u32 = 150;

    /// Gravity (px/tick per second). Not real-world g; tuned to look right.
    pub const GRAVITY: f64 = 9.5;
    /// Horizontal velocity multiplier applied every tick
    pub const AIR_RESISTANCE: f64 = 0.999;

    /// Restitution against the right world edge
    pub const RIGHT_WALL_BOUNCE: f64 = -0.7;
    /// Restitution against the left world edge and all obstacle walls
    pub const WALL_BOUNCE: f64 = -0.8;
    /// Restitution against floors and roofs
    pub const FLOOR_BOUNCE: f64 = -0.7;
    /// Rolling friction applied to vx on a floor bounce
    pub const FLOOR_FRICTION: f64 = 0.93;
    /// Restitution against the ceiling
    pub const CEILING_BOUNCE: f64 = -0.8;
    /// Friction applied to vx on a ceiling bounce
    pub const CEILING_FRICTION: f64 = 0.9;

    /// Bunker damping (both axes)
    pub const BUNKER_DAMPING: f64 = 0.4;
    /// One-shot horizontal boost when landing on ice
    pub const ICE_BOOST: f64 = 1.5;

    /// Converts aim distance (px) to per-tick velocity
    pub const AIM_DIVISOR: f64 = 40.0;
    /// Extra max power per cheat activation
    pub const POWER_BOOST_STEP: f64 = 100.0;

    /// Rest window for vx (open interval)
    pub const REST_VX: (f64, f64) = (-0.02, 0.02);
    /// Rest window for vy (open interval, asymmetric on purpose)
    pub const REST_VY: (f64, f64) = (-0.02, 0.2);
    /// The ball only drops into the hole below this horizontal speed
    pub const HOLE_MAX_SPEED: f64 = 5.0;
}

/// True if `v` lies strictly inside `(lo, hi)`
#[inline]
pub fn in_open_range(v: f64, (lo, hi): (f64, f64)) -> bool {
    lo < v && v < hi
}
