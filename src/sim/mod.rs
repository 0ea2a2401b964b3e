//! Deterministic simulation module
//!
//! All ball physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one Euler step per tick, no substepping
//! - Caller-driven: nothing reschedules itself
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use aim::{AimPreview, aim_preview, compute_velocity};
pub use collision::{Contact, OverlayRules, resolve_boundary};
pub use geometry::{
    Building, CourseHazards, Edges, Hole, LevelGeometry, LevelId, Obstacles, Slit, SlitWall, Span,
};
pub use state::{BallState, ShotPhase, ShotResult, SimEvent};
pub use tick::{Simulator, tick};
