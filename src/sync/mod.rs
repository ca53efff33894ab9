//! Lockstep handoff between the simulation thread and a render thread.

mod handoff;
mod runner;

pub use handoff::*;
pub use runner::*;
