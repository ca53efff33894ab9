use joltsim::InputSnapshot;

#[derive(Clone, Debug)]
pub struct InputSeq {
    inputs: Vec<InputSnapshot>,
}

impl InputSeq {
    pub const fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    pub fn new_single(input: InputSnapshot) -> Self {
        Self {
            inputs: vec![input],
        }
    }

    pub fn get_input_at_tick(&self, tick: u64) -> InputSnapshot {
        match self.inputs.get(tick as usize) {
            Some(input) => *input,
            None => self.inputs.last().copied().unwrap_or_default(),
        }
    }

    pub fn add(mut self, input: InputSnapshot, duration: u64) -> Self {
        assert!(duration > 0);
        for _ in 0..duration {
            self.inputs.push(input);
        }
        self
    }
}

pub struct InputBuilder {
    input: InputSnapshot,
}

impl InputBuilder {
    pub const fn new() -> Self {
        Self {
            input: InputSnapshot::DEFAULT,
        }
    }

    pub const fn with_accelerator(mut self, val: f32) -> Self {
        self.input.accelerator = val;
        self
    }

    pub const fn with_brake(mut self, val: f32) -> Self {
        self.input.brake = val;
        self
    }

    pub const fn with_steering(mut self, val: f32) -> Self {
        self.input.steering = val;
        self
    }

    pub const fn with_shift(mut self, val: i8) -> Self {
        self.input.shift = val;
        self
    }

    pub const fn with_steer_dir(mut self, val: i8) -> Self {
        self.input.steer_dir = val;
        self
    }

    pub const fn with_drive_dir(mut self, val: i8) -> Self {
        self.input.drive_dir = val;
        self
    }

    pub const fn build(&self) -> InputSnapshot {
        self.input
    }
}
