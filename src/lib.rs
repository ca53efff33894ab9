//! Fixed-step vehicle physics for a single deformable car on a static track.
//!
//! The car is a cloud of particles advanced with position-based dynamics: a
//! drivetrain force model and gravity predict new positions, a narrow-phase
//! resolver pushes them out of the track's static geometry, and a
//! shape-matching pass pulls the cloud back toward its rigid rest shape.
//!
//! [`Simulation`] runs one tick at a time. [`sync::SimulationRunner`] drives
//! it on its own thread in lockstep with a render thread.

pub mod consts;
mod error;
pub mod logging;
pub mod shared;
pub mod sim;
pub mod sync;

pub use error::*;
pub use sim::*;
