use log::info;

use crate::VehicleError;

/// Checkpoint and lap bookkeeping for one vehicle.
///
/// A gate counts only when it is the successor of the current one, or when the current
/// gate is the last and the gate is the first (which completes a lap).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RaceProgress {
    checkpoint: u32,
    lap: u32,
    max_laps: u32,
    finished: bool,
    last_checkpoint_time: f32,
    new_checkpoint: bool,
    lap_times: Vec<f32>,
}

impl RaceProgress {
    /// Starts on the line: checkpoint 0, lap 1.
    pub const fn new(max_laps: u32) -> Result<Self, VehicleError> {
        if max_laps == 0 {
            return Err(VehicleError::InvalidMaxLaps);
        }
        Ok(Self {
            checkpoint: 0,
            lap: 1,
            max_laps,
            finished: false,
            last_checkpoint_time: 0.0,
            new_checkpoint: false,
            lap_times: Vec::new(),
        })
    }

    #[must_use]
    pub const fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    #[must_use]
    pub const fn lap(&self) -> u32 {
        self.lap
    }

    #[must_use]
    pub const fn max_laps(&self) -> u32 {
        self.max_laps
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Simulated time of the last checkpoint change.
    #[must_use]
    pub const fn last_checkpoint_time(&self) -> f32 {
        self.last_checkpoint_time
    }

    /// Simulated time at which each completed lap ended.
    #[must_use]
    pub fn lap_times(&self) -> &[f32] {
        &self.lap_times
    }

    /// Returns true once per checkpoint change.
    pub fn take_checkpoint_event(&mut self) -> bool {
        std::mem::take(&mut self.new_checkpoint)
    }

    /// Applies the progression rule for a touched gate. Returns true if the checkpoint changed.
    ///
    /// `last_id` is the highest gate id on the track.
    pub fn advance(&mut self, touched_id: u32, last_id: u32, now: f32) -> bool {
        if self.finished || touched_id == self.checkpoint {
            return false;
        }

        let is_successor = self.checkpoint.checked_add(1) == Some(touched_id);
        let wraps = self.checkpoint == last_id && touched_id == 0;
        if !is_successor && !wraps {
            return false;
        }

        self.checkpoint = touched_id;
        self.new_checkpoint = true;
        self.last_checkpoint_time = now;

        if touched_id == 0 {
            self.lap_times.push(now);
            self.lap += 1;
            if self.lap > self.max_laps {
                self.lap = self.max_laps;
                self.finished = true;
                info!("Race finished at t={now:.3}s");
            } else {
                info!("Lap {} started at t={now:.3}s", self.lap);
            }
        } else {
            info!("Checkpoint {touched_id} reached at t={now:.3}s");
        }

        true
    }
}
