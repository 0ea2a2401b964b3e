//! Ball state and the values the simulation reports back

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Edges;
use crate::consts::*;
use crate::in_open_range;

/// Where a shot is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// Level just loaded, waiting for the first shot
    Ready,
    /// Ball in motion, ticking
    Flying,
    /// Ball came to rest, waiting for the next shot
    Rested,
    /// Ball dropped into the hole and was removed
    Holed,
}

impl ShotPhase {
    /// Whether a new shot may be fired from this phase
    pub fn accepts_shot(self) -> bool {
        matches!(self, ShotPhase::Ready | ShotPhase::Rested)
    }
}

/// Outcome of one ball tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotResult {
    StillMoving,
    /// Ball stopped; carries the rest spot as (left edge, bottom edge)
    Rested(DVec2),
    Holed,
}

impl ShotResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ShotResult::StillMoving)
    }
}

/// Notifications for the presentation layer, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    PositionChanged(Edges),
    Rested(DVec2),
    Holed,
    SlitMoved { top: f64, bottom: f64 },
}

/// The ball. Stored as its top-left corner; the edges follow from the
/// fixed diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Top-left corner of the bounding box
    pub pos: DVec2,
    /// Displacement per tick
    pub vel: DVec2,
    /// Set on the first tick of an ice contact; cleared once the ball is
    /// back on plain floor
    pub on_ice: bool,
    pub paused: bool,
}

impl BallState {
    /// Ball at rest with the given left and bottom edges
    pub fn at_rest_spot(spot: DVec2) -> Self {
        Self {
            pos: DVec2::new(spot.x, spot.y - BALL_DIAMETER),
            vel: DVec2::ZERO,
            on_ice: false,
            paused: false,
        }
    }

    /// Ball at the start position of every level
    pub fn at_level_origin() -> Self {
        Self::at_rest_spot(DVec2::new(LEVEL_ORIGIN.0, LEVEL_ORIGIN.1))
    }

    pub fn edges(&self) -> Edges {
        Edges {
            left: self.pos.x,
            top: self.pos.y,
            right: self.pos.x + BALL_DIAMETER,
            bottom: self.pos.y + BALL_DIAMETER,
        }
    }

    /// Left and bottom edges, the anchor for the next shot
    pub fn rest_spot(&self) -> DVec2 {
        DVec2::new(self.pos.x, self.pos.y + BALL_DIAMETER)
    }

    pub fn set_left(&mut self, x: f64) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f64) {
        self.pos.x = x - BALL_DIAMETER;
    }

    pub fn set_top(&mut self, y: f64) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f64) {
        self.pos.y = y - BALL_DIAMETER;
    }

    /// False once both velocity components fall inside the rest window
    pub fn is_moving(&self) -> bool {
        !(in_open_range(self.vel.x, REST_VX) && in_open_range(self.vel.y, REST_VY))
    }
}
