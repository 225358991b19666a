//! Deterministic virtual-time scheduler
//!
//! Keeps pending callbacks in memory and fires them when time is advanced
//! explicitly. Used for headless simulation, tests and benchmarks.

use crate::clock::{Driver, GameClock, Scheduler, TickOutcome, TickToken};

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: u64,
    /// Request order, breaks ties between callbacks due at the same instant
    seq: u64,
    token: TickToken,
}

#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    seq: u64,
    pending: Vec<Pending>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the pending callback for `driver`
    pub fn due_at(&self, driver: Driver) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.token.driver == driver)
            .map(|p| p.due_ms)
    }

    /// Pop the earliest callback due at or before `until_ms`, moving the clock to it
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TickToken> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, _)| i)?;
        let next = self.pending.swap_remove(idx);
        self.now_ms = next.due_ms;
        Some(next.token)
    }

    fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for VirtualScheduler {
    fn request_tick(&mut self, delay_ms: u32, token: TickToken) {
        self.pending.retain(|p| p.token.driver != token.driver);
        self.seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms as u64,
            seq: self.seq,
            token,
        });
    }

    fn cancel(&mut self, driver: Driver) {
        self.pending.retain(|p| p.token.driver != driver);
    }
}

impl GameClock<VirtualScheduler> {
    /// Advance virtual time by `ms`, firing every callback that falls due
    pub fn advance(&mut self, ms: u64) -> Vec<TickOutcome> {
        let target = self.scheduler().now_ms() + ms;
        let mut fired = Vec::new();
        while let Some(token) = self.scheduler_mut().pop_due(target) {
            fired.push(self.on_tick(token));
        }
        self.scheduler_mut().set_now(target);
        fired
    }

    /// Fire exactly `count` gravity ticks, interleaving elapsed ticks as they fall due
    pub fn run_gravity_ticks(&mut self, count: usize) -> Vec<TickOutcome> {
        let mut gravity = Vec::with_capacity(count);
        while gravity.len() < count {
            let Some(due) = self.scheduler().due_at(Driver::Gravity) else {
                break;
            };
            while let Some(token) = self.scheduler_mut().pop_due(due) {
                let outcome = self.on_tick(token);
                if token.driver == Driver::Gravity {
                    gravity.push(outcome);
                }
            }
        }
        gravity
    }
}
