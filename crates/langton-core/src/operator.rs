//! Operator control state for a running simulation.
//!
//! Shared between the tick loop and whatever drives it (a signal handler,
//! a control surface). The operator can pause and resume, change the tick
//! rate, ask for the last save to be reloaded or a new game started, and
//! request a clean stop.
//!
//! # Architecture
//!
//! Every control field is an atomic so the tick loop reads them without
//! locks. The loop only acts on them between ticks, never mid-step or
//! mid-save.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Reason why the simulation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// A request to replace the running simulation, applied before the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Reload the last save, falling back to a fresh board.
    Reload,
    /// Discard the current board and start over.
    NewGame,
}

impl SessionCommand {
    const fn encode(self) -> u8 {
        match self {
            Self::Reload => 1,
            Self::NewGame => 2,
        }
    }

    const fn decode(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Reload),
            2 => Some(Self::NewGame),
            _ => None,
        }
    }
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Wakes the tick loop on resume or stop.
    wake: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Ticks per second, never below 1.
    tick_rate: AtomicU32,

    /// Pending [`SessionCommand`], 0 when none.
    pending: AtomicU8,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl OperatorState {
    /// Create operator state. A `tick_rate` of 0 is raised to 1.
    pub fn new(tick_rate: u32, max_ticks: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_rate: AtomicU32::new(tick_rate.max(1)),
            pending: AtomicU8::new(0),
            max_ticks,
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The tick loop will sleep until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    /// Flip between paused and running. Returns `true` if now paused.
    pub fn toggle_pause(&self) -> bool {
        let was_paused = self.paused.fetch_xor(true, Ordering::AcqRel);
        if was_paused {
            self.wake.notify_one();
        }
        !was_paused
    }

    /// Wait until the simulation is resumed or a stop is requested.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.wake.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop after the current tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Tick rate
    // -----------------------------------------------------------------------

    /// Current ticks per second.
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate.load(Ordering::Acquire)
    }

    /// Set ticks per second. Returns the previous rate, or `None` if
    /// `rate` is 0 and was rejected.
    pub fn set_tick_rate(&self, rate: u32) -> Option<u32> {
        if rate == 0 {
            return None;
        }
        Some(self.tick_rate.swap(rate, Ordering::AcqRel))
    }

    /// One tick per second faster. Returns the new rate.
    pub fn speed_up(&self) -> u32 {
        let prev = self
            .tick_rate
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| {
                Some(r.saturating_add(1))
            })
            .unwrap_or_else(|current| current);
        prev.saturating_add(1)
    }

    /// One tick per second slower, never below 1. Returns the new rate.
    pub fn slow_down(&self) -> u32 {
        let prev = self
            .tick_rate
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| {
                Some(r.saturating_sub(1).max(1))
            })
            .unwrap_or_else(|current| current);
        prev.saturating_sub(1).max(1)
    }

    /// Sleep between ticks at the current rate.
    pub fn tick_interval(&self) -> Duration {
        let millis = 1000_u64
            .checked_div(u64::from(self.tick_rate()))
            .unwrap_or(0);
        Duration::from_millis(millis)
    }

    // -----------------------------------------------------------------------
    // Session commands
    // -----------------------------------------------------------------------

    /// Queue a reload or new game. A later request replaces an earlier
    /// one that has not been applied yet.
    pub fn request(&self, command: SessionCommand) {
        self.pending.store(command.encode(), Ordering::Release);
    }

    /// Take the pending command, if any.
    pub fn take_pending(&self) -> Option<SessionCommand> {
        SessionCommand::decode(self.pending.swap(0, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Maximum number of ticks (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Whether `ticks_run` has reached the limit.
    pub const fn tick_limit_reached(&self, ticks_run: u64) -> bool {
        self.max_ticks > 0 && ticks_run >= self.max_ticks
    }
}
