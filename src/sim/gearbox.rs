use std::fmt;

use log::debug;

use crate::consts::drivetrain;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Gear {
    Reverse = -1,
    #[default]
    Neutral = 0,
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
}

impl Gear {
    pub const FORWARD: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    #[must_use]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Out-of-range values saturate to [`Gear::Reverse`] or [`Gear::Fourth`].
    #[must_use]
    pub const fn from_i8_saturating(value: i8) -> Self {
        match value {
            i8::MIN..=-1 => Self::Reverse,
            0 => Self::Neutral,
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            _ => Self::Fourth,
        }
    }

    #[must_use]
    pub const fn is_forward(self) -> bool {
        self.as_i8() > 0
    }

    /// Gearbox ratio, excluding the final drive. Neutral and reverse share first gear's ratio.
    #[must_use]
    pub const fn ratio(self) -> f32 {
        match self {
            Self::Reverse | Self::Neutral | Self::First => drivetrain::GEAR_RATIOS[0],
            Self::Second => drivetrain::GEAR_RATIOS[1],
            Self::Third => drivetrain::GEAR_RATIOS[2],
            Self::Fourth => drivetrain::GEAR_RATIOS[3],
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reverse => write!(f, "R"),
            Self::Neutral => write!(f, "N"),
            other => write!(f, "{}", other.as_i8()),
        }
    }
}

/// Direction the driver is asking for this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveIntent {
    None,
    Forward,
    Backward,
}

/// Which longitudinal force the drivetrain applies.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccelMode {
    #[default]
    Coast,
    /// Engine traction along the heading.
    Accelerate,
    /// Brake force opposing the current longitudinal velocity.
    Brake,
    /// Stronger brake, used when the driver asks to change direction in a high gear.
    HardBrake,
    /// Constant push backward along the heading.
    Reverse,
}

/// Output of [`GearBox::update`] for the force model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriveCommand {
    pub mode: AccelMode,
    /// Pedal coefficient in `[0, 1]` scaling the selected force.
    pub coefficient: f32,
}

impl DriveCommand {
    pub const COAST: Self = Self {
        mode: AccelMode::Coast,
        coefficient: 0.0,
    };
}

/// Gear selection and brake-before-reverse logic.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GearBox {
    gear: Gear,
}

impl GearBox {
    #[must_use]
    pub const fn new(gear: Gear) -> Self {
        Self { gear }
    }

    #[must_use]
    pub const fn gear(&self) -> Gear {
        self.gear
    }

    /// Applies a shift edge. Only moves within the forward gears; from neutral an upshift
    /// engages first gear.
    pub fn shift(&mut self, delta: i8) {
        let next = match (self.gear, delta.signum()) {
            (_, 0) => return,
            (Gear::Neutral, 1) => Gear::First,
            (gear, d) if gear.is_forward() => {
                Gear::from_i8_saturating((gear.as_i8() + d).clamp(1, 4))
            }
            _ => return,
        };
        self.set_gear(next);
    }

    /// Advances the state machine for one tick and selects the force to apply.
    ///
    /// `v_long` is the longitudinal velocity along the vehicle heading, `pedal` the
    /// coefficient of whichever pedal produced `intent`.
    pub fn update(&mut self, intent: DriveIntent, v_long: f32, pedal: f32) -> DriveCommand {
        let pedal = pedal.clamp(0.0, 1.0);
        let rolling_back = v_long < -drivetrain::REVERSE_ENGAGE_SPEED;
        let rolling_forward = v_long > drivetrain::REVERSE_ENGAGE_SPEED;

        let mode = match intent {
            DriveIntent::None => return DriveCommand::COAST,
            DriveIntent::Forward => match self.gear {
                Gear::Neutral => {
                    self.set_gear(Gear::First);
                    AccelMode::Accelerate
                }
                // Stay in reverse until the car stops rolling backward; forward traction slows it.
                Gear::Reverse if rolling_back => AccelMode::Accelerate,
                Gear::Reverse => {
                    self.set_gear(Gear::First);
                    AccelMode::Accelerate
                }
                Gear::First => AccelMode::Accelerate,
                _ if rolling_back => AccelMode::HardBrake,
                _ => AccelMode::Accelerate,
            },
            DriveIntent::Backward => match self.gear {
                Gear::Neutral => {
                    self.set_gear(Gear::Reverse);
                    AccelMode::Reverse
                }
                Gear::Reverse => AccelMode::Reverse,
                Gear::First if rolling_back => {
                    self.set_gear(Gear::Reverse);
                    AccelMode::Reverse
                }
                Gear::First if rolling_forward => AccelMode::Brake,
                Gear::First => AccelMode::Reverse,
                _ if rolling_forward => AccelMode::HardBrake,
                _ => {
                    self.set_gear(Gear::First);
                    AccelMode::Reverse
                }
            },
        };

        let coefficient = match mode {
            AccelMode::Reverse => 1.0,
            _ => pedal,
        };

        DriveCommand { mode, coefficient }
    }

    fn set_gear(&mut self, gear: Gear) {
        if gear != self.gear {
            debug!("Gear {} -> {}", self.gear, gear);
            self.gear = gear;
        }
    }
}
