use log::trace;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Control signals for one tick, copied out of the input source.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSnapshot {
    /// Accelerator pedal in `[0, 1]`.
    pub accelerator: f32,
    /// Brake pedal in `[0, 1]`.
    pub brake: f32,
    /// Analog steering angle in radians, positive to the left. Scaled down by
    /// [`STEER_PRESCALE`](crate::consts::drivetrain::STEER_PRESCALE) before use.
    pub steering: f32,
    /// Gear shift edge: `-1`, `0` or `+1`.
    pub shift: i8,
    /// Digital steering override: `-1` left, `+1` right, `0` keeps the analog value.
    pub steer_dir: i8,
    /// Digital drive override: `+1` forward, `-1` backward, both at full accelerator.
    pub drive_dir: i8,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl InputSnapshot {
    /// No pedals, no steering, no edges. Used when the input source goes away.
    pub const DEFAULT: Self = Self {
        accelerator: 0.0,
        brake: 0.0,
        steering: 0.0,
        shift: 0,
        steer_dir: 0,
        drive_dir: 0,
    };

    #[must_use]
    pub fn clamp(&self) -> Self {
        Self {
            accelerator: finite_or_zero(self.accelerator).clamp(0.0, 1.0),
            brake: finite_or_zero(self.brake).clamp(0.0, 1.0),
            steering: finite_or_zero(self.steering),
            shift: self.shift.signum(),
            steer_dir: self.steer_dir.signum(),
            drive_dir: self.drive_dir.signum(),
        }
    }

    /// The same snapshot with the one-shot fields cleared.
    #[must_use]
    pub const fn without_edges(&self) -> Self {
        Self {
            shift: 0,
            steer_dir: 0,
            drive_dir: 0,
            ..*self
        }
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

struct InputState {
    snapshot: Mutex<InputSnapshot>,
    alive: AtomicBool,
}

/// Control state shared between the input thread and the simulation thread.
///
/// Neither side ever blocks on the other: the writer skips a publish if the reader holds
/// the lock, and the reader falls back to its previous copy.
#[derive(Clone)]
pub struct SharedInput(Arc<InputState>);

impl Default for SharedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedInput {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(InputState {
            snapshot: Mutex::new(InputSnapshot::DEFAULT),
            alive: AtomicBool::new(true),
        }))
    }

    /// Returns false if the lock was busy and nothing was written.
    ///
    /// A pending shift edge that the reader has not taken yet survives a publish with no shift.
    pub fn try_publish(&self, snapshot: InputSnapshot) -> bool {
        let Some(mut cur) = self.0.snapshot.try_lock() else {
            return false;
        };
        let pending_shift = cur.shift;
        *cur = snapshot.clamp();
        if cur.shift == 0 {
            cur.shift = pending_shift;
        }
        true
    }

    /// Marks the input source as gone (or back). While gone, readers see [`InputSnapshot::DEFAULT`].
    pub fn set_alive(&self, alive: bool) {
        self.0.alive.store(alive, Ordering::Release);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.alive.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn reader(&self) -> InputReader {
        InputReader {
            shared: self.clone(),
            last: InputSnapshot::DEFAULT,
        }
    }
}

/// Simulation-side handle onto a [`SharedInput`].
pub struct InputReader {
    shared: SharedInput,
    last: InputSnapshot,
}

impl InputReader {
    /// Copies the current snapshot and takes its edges, so each edge is seen by exactly one tick.
    pub fn read(&mut self) -> InputSnapshot {
        if !self.shared.is_alive() {
            self.last = InputSnapshot::DEFAULT;
            return InputSnapshot::DEFAULT;
        }

        match self.shared.0.snapshot.try_lock() {
            Some(mut cur) => {
                let snapshot = *cur;
                *cur = cur.without_edges();
                self.last = snapshot.without_edges();
                snapshot
            }
            None => {
                trace!("Input lock busy, reusing previous snapshot");
                self.last
            }
        }
    }
}
