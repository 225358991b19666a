//! Game clock - drives a session from an external scheduler
//!
//! Two periodic drivers run while the session is `Running`:
//!
//! - **Gravity**: every `fall_delay_ms`, one [`Session::gravity_step`]
//! - **Elapsed**: every [`ELAPSED_TICK_MS`], one [`Session::elapsed_tick`]
//!
//! The clock never sleeps. It asks the [`Scheduler`] for a single callback per
//! driver and re-arms after each tick. Every request carries a [`TickToken`]
//! holding the driver's current generation; pausing, resetting or changing the
//! fall delay bumps the generation and cancels the pending callback, so a tick
//! that was already in flight is recognised as stale and dropped.

use crate::core::{GameOverRecord, RenderSnapshot, Session, StepOutcome};
use crate::types::{Command, ELAPSED_TICK_MS};

/// The two periodic drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Driver {
    Gravity,
    Elapsed,
}

/// Identifies one scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickToken {
    pub driver: Driver,
    pub generation: u64,
}

/// External timer service
pub trait Scheduler {
    /// Deliver `token` back to [`GameClock::on_tick`] once, after `delay_ms`.
    fn request_tick(&mut self, delay_ms: u32, token: TickToken);

    /// Drop the pending callback for `driver`, if any.
    fn cancel(&mut self, driver: Driver);
}

/// What a delivered tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Superseded token, ignored
    Stale,
    Gravity(StepOutcome),
    Elapsed,
}

impl TickOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickOutcome::Gravity(StepOutcome::GameOver { .. }))
    }
}

/// Owns the session and its drivers
#[derive(Debug)]
pub struct GameClock<S: Scheduler> {
    session: Session,
    scheduler: S,
    gravity_generation: u64,
    elapsed_generation: u64,
}

impl<S: Scheduler> GameClock<S> {
    pub fn new(session: Session, scheduler: S) -> Self {
        Self {
            session,
            scheduler,
            gravity_generation: 0,
            elapsed_generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.session.snapshot()
    }

    pub fn game_over(&self) -> Option<GameOverRecord> {
        self.session.game_over_record()
    }

    fn token(&self, driver: Driver) -> TickToken {
        let generation = match driver {
            Driver::Gravity => self.gravity_generation,
            Driver::Elapsed => self.elapsed_generation,
        };
        TickToken { driver, generation }
    }

    fn arm(&mut self, driver: Driver) {
        let delay = match driver {
            Driver::Gravity => self.session.fall_delay_ms(),
            Driver::Elapsed => ELAPSED_TICK_MS,
        };
        let token = self.token(driver);
        self.scheduler.request_tick(delay, token);
    }

    /// Invalidate outstanding tokens for `driver` and cancel its callback
    fn disarm(&mut self, driver: Driver) {
        match driver {
            Driver::Gravity => self.gravity_generation += 1,
            Driver::Elapsed => self.elapsed_generation += 1,
        }
        self.scheduler.cancel(driver);
    }

    fn disarm_all(&mut self) {
        self.disarm(Driver::Gravity);
        self.disarm(Driver::Elapsed);
    }

    /// Idle/Paused -> Running, arming both drivers
    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.disarm_all();
        self.arm(Driver::Gravity);
        self.arm(Driver::Elapsed);
        true
    }

    /// Running -> Paused, cancelling both drivers
    pub fn pause(&mut self) -> bool {
        if !self.session.pause() {
            return false;
        }
        self.disarm_all();
        true
    }

    /// Stop both drivers and return the session to Idle
    pub fn reset(&mut self) {
        self.disarm_all();
        self.session.reset();
    }

    /// Scheduler callback
    pub fn on_tick(&mut self, token: TickToken) -> TickOutcome {
        if token != self.token(token.driver) || !self.session.is_running() {
            return TickOutcome::Stale;
        }

        let outcome = match token.driver {
            Driver::Gravity => TickOutcome::Gravity(self.session.gravity_step()),
            Driver::Elapsed => {
                self.session.elapsed_tick();
                TickOutcome::Elapsed
            }
        };

        if outcome.is_game_over() {
            self.disarm_all();
        } else {
            self.arm(token.driver);
        }
        outcome
    }

    /// Player command. Returns `false` for rejected or ignored commands.
    pub fn on_input(&mut self, command: Command) -> bool {
        let outcome = self.session.apply_command_outcome(command);
        if matches!(outcome, StepOutcome::GameOver { .. }) {
            self.disarm_all();
        }
        outcome != StepOutcome::Ignored
    }

    /// Change the fall delay and reschedule gravity immediately.
    ///
    /// Returns the applied (clamped) delay.
    pub fn on_interval_change(&mut self, delay_ms: u32) -> u32 {
        let applied = self.session.set_fall_delay(delay_ms);
        self.reschedule_gravity();
        applied
    }

    pub fn speed_up(&mut self) -> u32 {
        let applied = self.session.speed_up();
        self.reschedule_gravity();
        applied
    }

    pub fn slow_down(&mut self) -> u32 {
        let applied = self.session.slow_down();
        self.reschedule_gravity();
        applied
    }

    fn reschedule_gravity(&mut self) {
        if self.session.is_running() {
            self.disarm(Driver::Gravity);
            self.arm(Driver::Gravity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    /// Records requests instead of firing them
    #[derive(Debug, Default)]
    struct RecordingScheduler {
        requests: Vec<(u32, TickToken)>,
        cancels: Vec<Driver>,
    }

    impl Scheduler for RecordingScheduler {
        fn request_tick(&mut self, delay_ms: u32, token: TickToken) {
            self.requests.push((delay_ms, token));
        }

        fn cancel(&mut self, driver: Driver) {
            self.cancels.push(driver);
        }
    }

    fn clock() -> GameClock<RecordingScheduler> {
        GameClock::new(Session::new(42), RecordingScheduler::default())
    }

    fn last_token(clock: &GameClock<RecordingScheduler>, driver: Driver) -> TickToken {
        clock
            .scheduler()
            .requests
            .iter()
            .rev()
            .find(|(_, t)| t.driver == driver)
            .map(|(_, t)| *t)
            .unwrap()
    }

    #[test]
    fn test_start_arms_both_drivers() {
        let mut clock = clock();
        assert!(clock.start());
        let requests = &clock.scheduler().requests;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, 1000);
        assert_eq!(requests[0].1.driver, Driver::Gravity);
        assert_eq!(requests[1].0, ELAPSED_TICK_MS);
        assert_eq!(requests[1].1.driver, Driver::Elapsed);
    }

    #[test]
    fn test_tick_rearms_driver() {
        let mut clock = clock();
        clock.start();
        let token = last_token(&clock, Driver::Elapsed);

        assert_eq!(clock.on_tick(token), TickOutcome::Elapsed);
        assert_eq!(clock.session().elapsed_ticks(), 1);
        assert_eq!(clock.scheduler().requests.len(), 3);
        assert_eq!(last_token(&clock, Driver::Elapsed), token);
    }

    #[test]
    fn test_interval_change_invalidates_pending_gravity() {
        let mut clock = clock();
        clock.start();
        let stale = last_token(&clock, Driver::Gravity);

        assert_eq!(clock.on_interval_change(200), 200);
        assert!(clock.scheduler().cancels.contains(&Driver::Gravity));
        let fresh = last_token(&clock, Driver::Gravity);
        assert_ne!(fresh, stale);
        assert_eq!(clock.scheduler().requests.last().unwrap().0, 200);

        let before = clock.session().active();
        assert_eq!(clock.on_tick(stale), TickOutcome::Stale);
        assert_eq!(clock.session().active(), before);
        assert!(matches!(clock.on_tick(fresh), TickOutcome::Gravity(_)));
    }

    #[test]
    fn test_interval_change_while_paused_does_not_arm() {
        let mut clock = clock();
        clock.start();
        clock.pause();
        let requests = clock.scheduler().requests.len();
        assert_eq!(clock.on_interval_change(300), 300);
        assert_eq!(clock.scheduler().requests.len(), requests);
        assert_eq!(clock.session().fall_delay_ms(), 300);
    }

    #[test]
    fn test_pause_makes_pending_ticks_stale() {
        let mut clock = clock();
        clock.start();
        let gravity = last_token(&clock, Driver::Gravity);
        let elapsed = last_token(&clock, Driver::Elapsed);

        assert!(clock.pause());
        assert_eq!(clock.session().phase(), Phase::Paused);
        assert_eq!(clock.on_tick(gravity), TickOutcome::Stale);
        assert_eq!(clock.on_tick(elapsed), TickOutcome::Stale);
        assert_eq!(clock.session().elapsed_ticks(), 0);

        assert!(clock.start());
        assert_eq!(clock.on_tick(gravity), TickOutcome::Stale);
        let resumed = last_token(&clock, Driver::Gravity);
        assert!(matches!(clock.on_tick(resumed), TickOutcome::Gravity(_)));
    }

    #[test]
    fn test_speed_steps_go_through_reschedule() {
        let mut clock = clock();
        clock.start();
        assert_eq!(clock.speed_up(), 950);
        assert_eq!(clock.scheduler().requests.last().unwrap().0, 950);
        assert_eq!(clock.slow_down(), 1000);
        assert_eq!(clock.scheduler().requests.last().unwrap().0, 1000);
    }

    #[test]
    fn test_input_passes_through() {
        let mut clock = clock();
        assert!(!clock.on_input(Command::MoveLeft));
        clock.start();
        assert!(clock.on_input(Command::MoveLeft));
    }

    #[test]
    fn test_reset_cancels_and_idles() {
        let mut clock = clock();
        clock.start();
        let gravity = last_token(&clock, Driver::Gravity);
        clock.reset();
        assert_eq!(clock.session().phase(), Phase::Idle);
        assert_eq!(clock.on_tick(gravity), TickOutcome::Stale);
    }
}
