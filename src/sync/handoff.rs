use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct TurnState {
    render_ready_for_physics: bool,
    physics_ready_for_car_draw: bool,
    stop: bool,
}

/// Strict turn-taking between one physics thread and one render thread.
///
/// Physics goes first. After each tick it hands the turn to the renderer, which takes
/// its copy of the frame and hands the turn back. Neither side runs its half while the
/// other holds the turn, so vehicle state has a single writer at any time.
///
/// Every wait returns `false` once [`FrameHandoff::stop`] has been called.
#[derive(Debug)]
pub struct FrameHandoff {
    state: Mutex<TurnState>,
    cvar: Condvar,
}

impl Default for FrameHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHandoff {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(TurnState {
                render_ready_for_physics: true,
                physics_ready_for_car_draw: false,
                stop: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Blocks until the renderer has released the previous frame, then takes the turn.
    pub fn physics_wait_turn(&self) -> bool {
        let mut state = self.state.lock();
        self.cvar
            .wait_while(&mut state, |s| !s.render_ready_for_physics && !s.stop);
        if state.stop {
            return false;
        }
        state.render_ready_for_physics = false;
        true
    }

    /// Publishes the finished tick to the renderer.
    pub fn physics_done(&self) {
        self.state.lock().physics_ready_for_car_draw = true;
        self.cvar.notify_all();
    }

    /// Blocks until physics has finished a tick, then takes the turn.
    pub fn render_wait_frame(&self) -> bool {
        let mut state = self.state.lock();
        self.cvar
            .wait_while(&mut state, |s| !s.physics_ready_for_car_draw && !s.stop);
        if state.stop {
            return false;
        }
        state.physics_ready_for_car_draw = false;
        true
    }

    /// Hands the turn back to physics.
    pub fn render_done(&self) {
        self.state.lock().render_ready_for_physics = true;
        self.cvar.notify_all();
    }

    /// Wakes both sides and makes every current and future wait return `false`.
    pub fn stop(&self) {
        {
            let mut state = self.state.lock();
            state.stop = true;
            state.physics_ready_for_car_draw = true;
        }
        self.cvar.notify_all();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.lock().stop
    }
}
