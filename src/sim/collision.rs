//! Collision detection and response
//!
//! Two layers run every tick: the world boundary (at most one side resolved
//! per tick, in a fixed priority order) and then the level's own obstacles.
//! Responses scale velocity components by fixed restitution factors and push
//! the ball back onto the surface it crossed.

use super::geometry::{Building, CourseHazards, LevelGeometry, Obstacles, Slit, SlitWall};
use super::state::BallState;
use crate::consts::*;

/// Distance from a slit edge that still counts as touching it
pub const SLIT_TOLERANCE: f64 = 2.0;

/// What the ball touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    RightEdge,
    LeftEdge,
    Floor,
    Ceiling,
    /// Side face of an obstacle
    Wall,
    Roof,
    Bunker,
    Ice,
    SlitFloor,
    SlitCeiling,
}

impl Contact {
    /// Whether the ball is sitting on something, so it can come to rest
    pub fn supports(self) -> bool {
        matches!(
            self,
            Contact::Floor | Contact::Roof | Contact::Bunker | Contact::Ice | Contact::SlitFloor
        )
    }
}

/// Bounce off the floor-like surface at `y` (ball's bottom edge)
fn land_on(ball: &mut BallState, y: f64) {
    ball.vel.y *= FLOOR_BOUNCE;
    ball.vel.x *= FLOOR_FRICTION;
    ball.set_bottom(y);
}

/// Resolve the world boundary. Right, left, floor, ceiling: first hit wins.
pub fn resolve_boundary(ball: &mut BallState, geometry: &LevelGeometry) -> Option<Contact> {
    let e = ball.edges();

    if e.right >= geometry.width {
        ball.vel.x *= RIGHT_WALL_BOUNCE;
        ball.set_right(geometry.width);
        Some(Contact::RightEdge)
    } else if e.left <= 0.0 {
        ball.vel.x *= WALL_BOUNCE;
        ball.set_left(0.0);
        Some(Contact::LeftEdge)
    } else if e.bottom >= geometry.floor_y {
        land_on(ball, geometry.floor_y);
        Some(Contact::Floor)
    } else if e.top <= 0.0 {
        ball.vel.y *= CEILING_BOUNCE;
        ball.vel.x *= CEILING_FRICTION;
        ball.set_top(0.0);
        Some(Contact::Ceiling)
    } else {
        None
    }
}

/// Level-specific collision layered on top of the boundary pass
pub trait OverlayRules {
    /// Adjust the ball for this level's obstacles. `slit` is the current
    /// slit band for levels that have one.
    fn apply_overlay(&self, ball: &mut BallState, slit: Option<&Slit>) -> Option<Contact>;
}

impl OverlayRules for CourseHazards {
    fn apply_overlay(&self, ball: &mut BallState, _slit: Option<&Slit>) -> Option<Contact> {
        let e = ball.edges();
        if e.bottom < FLOOR_Y {
            return None;
        }

        let on_ice_patch = self.ice.overlaps(e.left, e.right);
        if self.bunker.overlaps(e.left, e.right) {
            ball.vel *= BUNKER_DAMPING;
            ball.set_bottom(FLOOR_Y);
            Some(Contact::Bunker)
        } else if on_ice_patch && !ball.on_ice {
            ball.vel.x *= ICE_BOOST;
            ball.on_ice = true;
            ball.set_bottom(FLOOR_Y);
            Some(Contact::Ice)
        } else {
            if !on_ice_patch {
                ball.on_ice = false;
            }
            None
        }
    }
}

impl OverlayRules for Building {
    fn apply_overlay(&self, ball: &mut BallState, _slit: Option<&Slit>) -> Option<Contact> {
        let e = ball.edges();

        if self.left_wall.contains(e.right) && self.wall_band.contains(e.bottom) {
            ball.vel.x *= WALL_BOUNCE;
            ball.set_right(self.left_wall.min);
            Some(Contact::Wall)
        } else if self.right_wall.contains(e.left) && self.wall_band.contains(e.bottom) {
            ball.vel.x *= WALL_BOUNCE;
            ball.set_left(self.right_wall.max);
            Some(Contact::Wall)
        } else if self.roof.contains(e.bottom) && self.roof_span.overlaps(e.left, e.right) {
            land_on(ball, self.roof.min);
            Some(Contact::Roof)
        } else {
            None
        }
    }
}

impl OverlayRules for SlitWall {
    fn apply_overlay(&self, ball: &mut BallState, slit: Option<&Slit>) -> Option<Contact> {
        let e = ball.edges();
        let admitted = slit.filter(|s| s.admits(&e, SLIT_TOLERANCE));

        let at_west_face = self.left_wall.contains(e.right);
        let at_east_face = self.right_wall.contains(e.left);
        if admitted.is_none() && (at_west_face || at_east_face) {
            ball.vel.x *= WALL_BOUNCE;
            if at_west_face {
                ball.set_right(self.left_wall.min);
            } else {
                ball.set_left(self.right_wall.max);
            }
            return Some(Contact::Wall);
        }

        // Inside the channel: the slit edges act as floor and ceiling.
        let slit = slit?;
        let in_opening = e.top < slit.bottom && e.bottom > slit.top;
        if !in_opening || !self.span().overlaps(e.left, e.right) {
            return None;
        }
        if ball.vel.y >= 0.0 && e.bottom >= slit.bottom - SLIT_TOLERANCE {
            land_on(ball, slit.bottom);
            Some(Contact::SlitFloor)
        } else if ball.vel.y <= 0.0 && e.top <= slit.top + SLIT_TOLERANCE {
            ball.vel.y *= FLOOR_BOUNCE;
            ball.vel.x *= FLOOR_FRICTION;
            ball.set_top(slit.top);
            Some(Contact::SlitCeiling)
        } else {
            None
        }
    }
}

impl OverlayRules for Obstacles {
    fn apply_overlay(&self, ball: &mut BallState, slit: Option<&Slit>) -> Option<Contact> {
        match self {
            Obstacles::Course(hazards) => hazards.apply_overlay(ball, slit),
            Obstacles::Building(building) => building.apply_overlay(ball, slit),
            Obstacles::SlitWall(wall) => wall.apply_overlay(ball, slit),
        }
    }
}
