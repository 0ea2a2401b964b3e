//! Fixed timestep simulation tick
//!
//! [`tick`] is the pure one-step physics update. [`Simulator`] owns the ball,
//! the level and the slit, and is advanced explicitly by the caller; it never
//! schedules itself.

use glam::DVec2;

use super::collision::{OverlayRules, resolve_boundary};
use super::geometry::{LevelGeometry, LevelId, Slit};
use super::state::{BallState, ShotPhase, ShotResult, SimEvent};
use crate::consts::*;

/// Longest stretch of time a single `advance` call will simulate
pub const MAX_CATCH_UP_MS: u32 = 250;

/// Advance a flying ball by one tick
///
/// Order: integrate, world boundary, level overlay, gravity, air resistance,
/// then rest and hole checks. A paused ball is left untouched.
pub fn tick(ball: &mut BallState, geometry: &LevelGeometry, slit: Option<&Slit>) -> ShotResult {
    if ball.paused {
        return ShotResult::StillMoving;
    }

    ball.pos += ball.vel;

    let boundary = resolve_boundary(ball, geometry);
    let overlay = geometry.obstacles.apply_overlay(ball, slit);

    ball.vel.y += GRAVITY * TICK_SECS;
    ball.vel.x *= AIR_RESISTANCE;

    // Only a supported ball can rest; otherwise a ball with no horizontal
    // speed would stop at the apex of every hop.
    let supported = boundary.is_some_and(|c| c.supports()) || overlay.is_some_and(|c| c.supports());
    if supported && !ball.is_moving() {
        return ShotResult::Rested(ball.rest_spot());
    }

    if geometry.hole.captures(&ball.edges(), ball.vel.x) {
        ShotResult::Holed
    } else {
        ShotResult::StillMoving
    }
}

/// One ball on one level, driven by the caller
#[derive(Debug, Clone)]
pub struct Simulator {
    geometry: LevelGeometry,
    /// `None` once the ball dropped into the hole
    ball: Option<BallState>,
    slit: Option<Slit>,
    phase: ShotPhase,
    /// Milliseconds since the last ball tick
    ball_clock_ms: u32,
    /// Milliseconds since the last slit step
    slit_clock_ms: u32,
    /// Ball ticks simulated on this level
    ticks: u64,
    events: Vec<SimEvent>,
}

impl Simulator {
    /// Start `level` with the ball at the level origin
    pub fn new(level: LevelId) -> Self {
        let geometry = LevelGeometry::for_level(level);
        Self {
            geometry,
            ball: Some(BallState::at_level_origin()),
            slit: geometry.initial_slit(),
            phase: ShotPhase::Ready,
            ball_clock_ms: 0,
            slit_clock_ms: 0,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// Switch to `level`. The ball starts at `carry_over` (left, bottom) if
    /// given, otherwise at the level origin.
    pub fn load_level(&mut self, level: LevelId, carry_over: Option<DVec2>) {
        let paused = self.is_paused();
        *self = Self::new(level);
        if let Some(spot) = carry_over {
            self.ball = Some(BallState::at_rest_spot(spot));
        }
        if let Some(ball) = self.ball.as_mut() {
            ball.paused = paused;
        }
        log::info!("Loaded level {}", level);
    }

    pub fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    pub fn level(&self) -> LevelId {
        self.geometry.id
    }

    pub fn ball(&self) -> Option<&BallState> {
        self.ball.as_ref()
    }

    pub fn slit(&self) -> Option<&Slit> {
        self.slit.as_ref()
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Anchor for aiming the next shot, if the ball is still on the course
    pub fn rest_spot(&self) -> Option<DVec2> {
        self.ball.as_ref().map(BallState::rest_spot)
    }

    pub fn can_fire(&self) -> bool {
        self.ball.is_some() && self.phase.accepts_shot()
    }

    /// Launch the ball. Refused (returns false) while a shot is in flight
    /// or after the ball was holed.
    pub fn fire(&mut self, velocity: DVec2) -> bool {
        if !self.can_fire() {
            log::warn!("Ignoring shot while {:?}", self.phase);
            return false;
        }
        let Some(prev) = self.ball.as_ref() else {
            return false;
        };

        let mut ball = BallState::at_rest_spot(prev.rest_spot());
        ball.vel = velocity;
        ball.on_ice = prev.on_ice;
        ball.paused = prev.paused;
        self.ball = Some(ball);
        self.phase = ShotPhase::Flying;
        self.ball_clock_ms = 0;
        log::debug!("Fired from {:?} with velocity {:?}", ball.rest_spot(), velocity);
        true
    }

    pub fn is_paused(&self) -> bool {
        self.ball.as_ref().is_some_and(|b| b.paused)
    }

    /// Freeze the ball and the slit
    pub fn pause(&mut self) {
        if let Some(ball) = self.ball.as_mut() {
            ball.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if let Some(ball) = self.ball.as_mut() {
            ball.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Result the current phase stands for, without simulating
    fn settled_result(&self) -> ShotResult {
        match (self.phase, self.ball.as_ref()) {
            (ShotPhase::Holed, _) | (_, None) => ShotResult::Holed,
            (ShotPhase::Flying, Some(_)) => ShotResult::StillMoving,
            (_, Some(ball)) => ShotResult::Rested(ball.rest_spot()),
        }
    }

    /// Run one ball tick. Outside the `Flying` phase this is a no-op that
    /// reports the settled result again.
    pub fn step(&mut self) -> ShotResult {
        if self.phase != ShotPhase::Flying {
            return self.settled_result();
        }
        let Some(ball) = self.ball.as_mut() else {
            return ShotResult::Holed;
        };
        if ball.paused {
            return ShotResult::StillMoving;
        }

        let result = tick(ball, &self.geometry, self.slit.as_ref());
        let edges = ball.edges();
        self.ticks += 1;
        self.events.push(SimEvent::PositionChanged(edges));

        match result {
            ShotResult::StillMoving => {}
            ShotResult::Rested(spot) => {
                self.phase = ShotPhase::Rested;
                self.events.push(SimEvent::Rested(spot));
                log::debug!("Ball rested at {:?} after {} ticks", spot, self.ticks);
            }
            ShotResult::Holed => {
                self.phase = ShotPhase::Holed;
                self.ball = None;
                self.events.push(SimEvent::Holed);
                log::info!("Holed on level {} after {} ticks", self.geometry.id, self.ticks);
            }
        }
        result
    }

    /// Move the slit one step. Frozen while the ball is paused.
    pub fn step_slit(&mut self) {
        if self.is_paused() {
            return;
        }
        if let Some(slit) = self.slit.as_mut() {
            if slit.step() {
                log::trace!("Slit reversed at {}..{}", slit.top, slit.bottom);
            }
            self.events.push(SimEvent::SlitMoved {
                top: slit.top,
                bottom: slit.bottom,
            });
        }
    }

    /// Advance both clocks by `elapsed_ms`, running ball ticks every
    /// [`TICK_MS`] and slit steps every [`SLIT_TICK_MS`] in time order.
    /// Returns the latest shot result.
    pub fn advance(&mut self, elapsed_ms: u32) -> ShotResult {
        let mut remaining = elapsed_ms.min(MAX_CATCH_UP_MS);
        let mut result = self.settled_result();

        loop {
            let to_ball = TICK_MS - self.ball_clock_ms;
            let to_slit = SLIT_TICK_MS - self.slit_clock_ms;
            let next = to_ball.min(to_slit);
            if next > remaining {
                self.ball_clock_ms += remaining;
                self.slit_clock_ms += remaining;
                break;
            }

            remaining -= next;
            self.ball_clock_ms += next;
            self.slit_clock_ms += next;

            if self.ball_clock_ms == TICK_MS {
                self.ball_clock_ms = 0;
                result = self.step();
            }
            if self.slit_clock_ms == SLIT_TICK_MS {
                self.slit_clock_ms = 0;
                self.step_slit();
            }
        }

        result
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_TICKS: usize = 20_000;

    fn flying(level: LevelId, left: f64, bottom: f64, vel: DVec2) -> Simulator {
        let mut sim = Simulator::new(level);
        sim.load_level(level, Some(DVec2::new(left, bottom)));
        assert!(sim.fire(vel));
        sim
    }

    fn run_to_end(sim: &mut Simulator) -> ShotResult {
        for _ in 0..MAX_TICKS {
            let result = sim.step();
            if result.is_terminal() {
                return result;
            }
        }
        panic!("shot did not finish within {MAX_TICKS} ticks");
    }

    #[test]
    fn test_tick_integrates_then_applies_gravity_and_drag() {
        let geometry = LevelGeometry::for_level(LevelId::One);
        let mut ball = BallState::at_rest_spot(DVec2::new(100.0, 600.0));
        ball.vel = DVec2::new(2.0, -3.0);

        assert_eq!(tick(&mut ball, &geometry, None), ShotResult::StillMoving);
        assert_eq!(ball.pos, DVec2::new(102.0, 567.0));
        assert!((ball.vel.x - 2.0 * AIR_RESISTANCE).abs() < 1e-12);
        assert!((ball.vel.y - (-3.0 + GRAVITY * TICK_SECS)).abs() < 1e-12);
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let geometry = LevelGeometry::for_level(LevelId::One);
        let mut ball = BallState::at_rest_spot(DVec2::new(100.0, 600.0));
        ball.vel = DVec2::new(2.0, -3.0);
        ball.paused = true;
        let before = ball;
        assert_eq!(tick(&mut ball, &geometry, None), ShotResult::StillMoving);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_slow_ball_over_hole_is_holed() {
        let mut sim = flying(LevelId::One, 1200.0, 720.0, DVec2::new(3.0, 0.0));
        assert_eq!(sim.step(), ShotResult::Holed);
        assert_eq!(sim.phase(), ShotPhase::Holed);
        assert!(sim.ball().is_none());
    }

    #[test]
    fn test_fast_ball_rolls_over_hole() {
        let mut sim = flying(LevelId::One, 1200.0, 720.0, DVec2::new(6.0, 0.0));
        assert_eq!(sim.step(), ShotResult::StillMoving);
        assert_eq!(sim.phase(), ShotPhase::Flying);
    }

    #[test]
    fn test_terminal_states_are_idempotent() {
        let mut sim = flying(LevelId::One, 1200.0, 720.0, DVec2::new(3.0, 0.0));
        assert_eq!(sim.step(), ShotResult::Holed);
        sim.drain_events();
        for _ in 0..5 {
            assert_eq!(sim.step(), ShotResult::Holed);
        }
        assert_eq!(sim.ticks(), 1);
        assert!(sim.drain_events().is_empty());

        let mut sim = flying(LevelId::One, 300.0, 720.0, DVec2::new(1.0, 0.0));
        let ShotResult::Rested(spot) = run_to_end(&mut sim) else {
            panic!("expected the ball to rest");
        };
        let ball = *sim.ball().unwrap();
        let ticks = sim.ticks();
        for _ in 0..5 {
            assert_eq!(sim.step(), ShotResult::Rested(spot));
        }
        assert_eq!(*sim.ball().unwrap(), ball);
        assert_eq!(sim.ticks(), ticks);
    }

    #[test]
    fn test_fire_refused_while_flying() {
        let mut sim = flying(LevelId::One, 100.0, 720.0, DVec2::new(4.0, -4.0));
        sim.step();
        assert!(!sim.can_fire());
        assert!(!sim.fire(DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_fire_refused_after_hole() {
        let mut sim = flying(LevelId::One, 1200.0, 720.0, DVec2::new(3.0, 0.0));
        sim.step();
        assert!(!sim.fire(DVec2::new(1.0, -1.0)));
        assert!(sim.rest_spot().is_none());
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut sim = flying(LevelId::Three, 100.0, 720.0, DVec2::new(2.0, -6.0));
        sim.step();
        sim.pause();
        let ball = *sim.ball().unwrap();
        let slit = *sim.slit().unwrap();
        for _ in 0..100 {
            assert_eq!(sim.advance(TICK_MS), ShotResult::StillMoving);
        }
        assert_eq!(*sim.ball().unwrap(), ball);
        assert_eq!(*sim.slit().unwrap(), slit);

        sim.resume();
        sim.step();
        assert_ne!(sim.ball().unwrap().pos, ball.pos);
    }

    #[test]
    fn test_advance_runs_ticks_on_schedule() {
        let mut sim = flying(LevelId::One, 100.0, 600.0, DVec2::new(1.0, 0.0));
        sim.advance(TICK_MS - 1);
        assert_eq!(sim.ticks(), 0);
        sim.advance(1);
        assert_eq!(sim.ticks(), 1);
        sim.advance(TICK_MS * 5);
        assert_eq!(sim.ticks(), 6);
    }

    #[test]
    fn test_slit_runs_on_its_own_clock() {
        let mut sim = Simulator::new(LevelId::Three);
        let start = *sim.slit().unwrap();

        // No shot in flight: the slit still moves, the ball does not
        sim.advance(SLIT_TICK_MS - 1);
        assert_eq!(*sim.slit().unwrap(), start);
        sim.advance(1);
        assert_eq!(sim.slit().unwrap().top, start.top + start.velocity);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::SlitMoved {
                top: start.top + start.velocity,
                bottom: start.bottom + start.velocity,
            }]
        );
    }

    #[test]
    fn test_level_three_slit_starts_mid_travel() {
        let mut sim = Simulator::new(LevelId::Three);
        let start = *sim.slit().unwrap();
        assert_eq!((start.top, start.bottom, start.velocity), (400.0, 500.0, 3.0));

        for _ in 0..16 {
            sim.advance(SLIT_TICK_MS);
        }
        assert_eq!(sim.slit().unwrap().bottom, 548.0);
        assert!(sim.slit().unwrap().velocity > 0.0);

        sim.advance(SLIT_TICK_MS);
        let slit = sim.slit().unwrap();
        assert_eq!((slit.top, slit.bottom), (450.0, 550.0));
        assert!(slit.velocity < 0.0);
        assert_eq!(
            sim.drain_events().last(),
            Some(&SimEvent::SlitMoved {
                top: 450.0,
                bottom: 550.0
            })
        );
    }

    #[test]
    fn test_rest_emits_events() {
        let mut sim = flying(LevelId::One, 300.0, 720.0, DVec2::new(0.5, 0.0));
        let result = run_to_end(&mut sim);
        let events = sim.drain_events();
        assert!(matches!(result, ShotResult::Rested(_)));
        assert_eq!(events.len() as u64, sim.ticks() + 1);
        assert!(matches!(events.last(), Some(SimEvent::Rested(_))));
        assert_eq!(sim.phase(), ShotPhase::Rested);
        assert!(sim.can_fire());
    }

    #[test]
    fn test_load_level_carries_position() {
        let mut sim = Simulator::new(LevelId::One);
        assert_eq!(sim.rest_spot(), Some(DVec2::new(5.0, 720.0)));
        sim.load_level(LevelId::Two, Some(DVec2::new(200.0, 720.0)));
        assert_eq!(sim.level(), LevelId::Two);
        assert_eq!(sim.rest_spot(), Some(DVec2::new(200.0, 720.0)));
        assert_eq!(sim.phase(), ShotPhase::Ready);
        assert!(sim.slit().is_none());
    }

    #[test]
    fn test_ice_latch_carries_into_next_shot() {
        let mut sim = flying(LevelId::One, 800.0, 720.0, DVec2::new(0.3, 0.0));
        assert!(matches!(run_to_end(&mut sim), ShotResult::Rested(_)));
        assert!(sim.ball().unwrap().on_ice);
        assert!(sim.fire(DVec2::new(0.5, 0.0)));
        assert!(sim.ball().unwrap().on_ice);
    }
}
