use log::{error, info};
use parking_lot::Mutex;
use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Instant,
};

use crate::{
    consts::epsilon,
    sim::{InputReader, Simulation, VehicleFrame},
    sync::FrameHandoff,
};

struct RunnerShared {
    handoff: FrameHandoff,
    // Written by physics only during its turn, read by the renderer only during its own.
    pose: Mutex<VehicleFrame>,
}

/// Owns the simulation thread. Dropping it stops and joins the thread.
pub struct SimulationRunner {
    shared: Arc<RunnerShared>,
    handle: Option<JoinHandle<Simulation>>,
}

/// Render-side handle onto a running simulation.
#[derive(Clone)]
pub struct RenderLink {
    shared: Arc<RunnerShared>,
}

impl SimulationRunner {
    /// Moves `sim` onto a new thread that ticks it with real elapsed time, one tick per
    /// render turn. Input is read once per tick from `input`.
    pub fn spawn(mut sim: Simulation, mut input: InputReader) -> io::Result<(Self, RenderLink)> {
        let mut initial = VehicleFrame::default();
        sim.copy_frame(&mut initial);

        let shared = Arc::new(RunnerShared {
            handoff: FrameHandoff::new(),
            pose: Mutex::new(initial),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("joltsim-physics".to_owned())
            .spawn(move || {
                info!("Simulation thread started");
                let mut last_tick: Option<Instant> = None;

                while thread_shared.handoff.physics_wait_turn() {
                    let now = Instant::now();
                    let dt = last_tick.map_or(sim.params().time_step, |last| {
                        now.duration_since(last).as_secs_f32()
                    });
                    last_tick = Some(now);

                    if dt > epsilon::MIN_TIME_STEP {
                        let snapshot = input.read();
                        sim.step_dt(dt, &snapshot);
                    }

                    sim.copy_frame(&mut thread_shared.pose.lock());
                    thread_shared.handoff.physics_done();
                }

                info!("Simulation thread stopped after {} ticks", sim.tick_count());
                sim
            })?;

        let link = RenderLink {
            shared: Arc::clone(&shared),
        };
        Ok((
            Self {
                shared,
                handle: Some(handle),
            },
            link,
        ))
    }

    pub fn shutdown(&self) {
        self.shared.handoff.stop();
    }

    /// Stops the thread and returns the simulation in its final state.
    /// `None` if the simulation thread panicked.
    pub fn join(mut self) -> Option<Simulation> {
        self.shutdown();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(sim) => Some(sim),
            Err(_) => {
                error!("Simulation thread panicked");
                None
            }
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shared.handoff.stop();
            let _ = handle.join();
        }
    }
}

impl RenderLink {
    /// Waits for the next tick and copies it into `frame`, then hands the turn back.
    /// Returns `false` once the simulation has been shut down.
    pub fn wait_frame(&self, frame: &mut VehicleFrame) -> bool {
        if !self.shared.handoff.render_wait_frame() {
            return false;
        }
        frame.clone_from(&self.shared.pose.lock());
        self.shared.handoff.render_done();
        true
    }

    /// Latest published frame, without taking a turn.
    #[must_use]
    pub fn read_frame(&self) -> VehicleFrame {
        self.shared.pose.lock().clone()
    }

    pub fn shutdown(&self) {
        self.shared.handoff.stop();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shared.handoff.is_stopped()
    }
}
