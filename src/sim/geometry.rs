//! Level geometry for the three courses
//!
//! Everything here is axis-aligned and expressed in screen coordinates
//! (y grows downward). Levels are immutable except for the level-3 slit,
//! which runs on its own clock.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Level identifier (1..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LevelId {
    /// Open course with a bunker and an ice patch
    One,
    /// A building in the middle of the course
    Two,
    /// A full-height wall pierced by a moving slit
    Three,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no such level: {0}")]
pub struct InvalidLevel(pub u8);

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::One, LevelId::Two, LevelId::Three];

    pub fn number(self) -> u8 {
        match self {
            LevelId::One => 1,
            LevelId::Two => 2,
            LevelId::Three => 3,
        }
    }

    /// The level after this one, or `None` after the last
    pub fn next(self) -> Option<Self> {
        match self {
            LevelId::One => Some(LevelId::Two),
            LevelId::Two => Some(LevelId::Three),
            LevelId::Three => None,
        }
    }

    /// Shot power cap before any cheat boosts
    pub fn base_max_power(self) -> f64 {
        match self {
            LevelId::One => 280.0,
            LevelId::Two => 350.0,
            LevelId::Three => 400.0,
        }
    }
}

impl TryFrom<u8> for LevelId {
    type Error = InvalidLevel;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(LevelId::One),
            2 => Ok(LevelId::Two),
            3 => Ok(LevelId::Three),
            _ => Err(InvalidLevel(n)),
        }
    }
}

impl From<LevelId> for u8 {
    fn from(id: LevelId) -> u8 {
        id.number()
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    /// True if `[lo, hi]` shares at least one point with this span
    #[inline]
    pub fn overlaps(&self, lo: f64, hi: f64) -> bool {
        hi >= self.min && lo <= self.max
    }
}

/// Bounding box of the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// The cup. Capture tests the ball's left edge, its bottom edge and its
/// horizontal speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Open interval for the left edge
    pub left: (f64, f64),
    pub bottom: Span,
    pub max_speed: f64,
}

impl Default for Hole {
    fn default() -> Self {
        Self {
            left: (1190.0, 1225.0),
            bottom: Span::new(FLOOR_Y - 1.0, FLOOR_Y + 1.0),
            max_speed: HOLE_MAX_SPEED,
        }
    }
}

impl Hole {
    /// Whether a ball with these edges and horizontal velocity drops in
    pub fn captures(&self, edges: &Edges, vx: f64) -> bool {
        crate::in_open_range(edges.left, self.left)
            && self.bottom.contains(edges.bottom)
            && vx.abs() < self.max_speed
    }
}

/// Level 1 floor hazards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseHazards {
    pub bunker: Span,
    pub ice: Span,
}

impl Default for CourseHazards {
    fn default() -> Self {
        Self {
            bunker: Span::new(415.0, 585.0),
            ice: Span::new(724.0, 905.0),
        }
    }
}

/// Level 2 building footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Range of the ball's right edge that counts as hitting the left wall
    pub left_wall: Span,
    /// Range of the ball's left edge that counts as hitting the right wall
    pub right_wall: Span,
    /// Bottom-edge band in which the walls are solid
    pub wall_band: Span,
    /// Bottom-edge band that counts as landing on the roof
    pub roof: Span,
    /// Horizontal extent of the roof
    pub roof_span: Span,
}

impl Default for Building {
    fn default() -> Self {
        Self {
            left_wall: Span::new(511.0, 550.0),
            right_wall: Span::new(680.0, 687.0),
            wall_band: Span::new(484.0, FLOOR_Y),
            roof: Span::new(470.0, 490.0),
            roof_span: Span::new(511.0, 687.0),
        }
    }
}

/// Level 3 divider: two full-height walls with a moving slit through both
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlitWall {
    /// Range of the ball's right edge that counts as hitting the west face
    pub left_wall: Span,
    /// Range of the ball's left edge that counts as hitting the east face
    pub right_wall: Span,
    /// Vertical range the slit travels in
    pub travel: Span,
    /// Top of the slit when the level loads
    pub initial_top: f64,
    pub slit_height: f64,
    /// Slit displacement per slit step
    pub slit_speed: f64,
}

impl Default for SlitWall {
    fn default() -> Self {
        Self {
            left_wall: Span::new(500.0, 514.0),
            right_wall: Span::new(516.0, 530.0),
            travel: Span::new(300.0, 550.0),
            initial_top: 400.0,
            slit_height: 100.0,
            slit_speed: 3.0,
        }
    }
}

impl SlitWall {
    /// Full horizontal extent of both walls
    pub fn span(&self) -> Span {
        Span::new(self.left_wall.min, self.right_wall.max)
    }

    /// Slit in its load position, moving down
    pub fn initial_slit(&self) -> Slit {
        Slit {
            top: self.initial_top,
            bottom: self.initial_top + self.slit_height,
            velocity: self.slit_speed,
            travel: self.travel,
        }
    }
}

/// The moving gap in the level-3 walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slit {
    pub top: f64,
    pub bottom: f64,
    /// Signed displacement per step (positive = down)
    pub velocity: f64,
    pub travel: Span,
}

impl Slit {
    /// Advance one slit step. Returns true if the slit reversed direction.
    pub fn step(&mut self) -> bool {
        self.top += self.velocity;
        self.bottom += self.velocity;

        if self.bottom >= self.travel.max {
            let overshoot = self.bottom - self.travel.max;
            self.top -= overshoot;
            self.bottom = self.travel.max;
            self.velocity = -self.velocity.abs();
            true
        } else if self.top <= self.travel.min {
            let overshoot = self.travel.min - self.top;
            self.bottom += overshoot;
            self.top = self.travel.min;
            self.velocity = self.velocity.abs();
            true
        } else {
            false
        }
    }

    /// Whether the ball fits vertically inside the opening (± `tolerance`)
    pub fn admits(&self, edges: &Edges, tolerance: f64) -> bool {
        edges.top >= self.top - tolerance && edges.bottom <= self.bottom + tolerance
    }
}

/// Per-level obstacle set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacles {
    Course(CourseHazards),
    Building(Building),
    SlitWall(SlitWall),
}

/// Static description of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub id: LevelId,
    pub width: f64,
    pub height: f64,
    pub floor_y: f64,
    pub hole: Hole,
    pub obstacles: Obstacles,
}

impl LevelGeometry {
    pub fn for_level(id: LevelId) -> Self {
        let obstacles = match id {
            LevelId::One => Obstacles::Course(CourseHazards::default()),
            LevelId::Two => Obstacles::Building(Building::default()),
            LevelId::Three => Obstacles::SlitWall(SlitWall::default()),
        };
        Self {
            id,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            floor_y: FLOOR_Y,
            hole: Hole::default(),
            obstacles,
        }
    }

    /// Fresh slit state if this level has one
    pub fn initial_slit(&self) -> Option<Slit> {
        match self.obstacles {
            Obstacles::SlitWall(wall) => Some(wall.initial_slit()),
            _ => None,
        }
    }
}
