mod collision;
mod drivetrain;
mod gearbox;
mod input;
mod integrator;
mod linear_piece_curve;
mod shape_matching;
mod sim_params;
mod simulation;
mod spatial_grid;
mod static_entity;
mod terrain;
mod track;
mod vehicle;

pub use collision::*;
pub use drivetrain::*;
pub use gearbox::*;
pub use input::*;
pub use integrator::*;
pub use linear_piece_curve::*;
pub use shape_matching::*;
pub use sim_params::*;
pub use simulation::*;
pub use spatial_grid::*;
pub use static_entity::*;
pub use terrain::*;
pub use track::*;
pub use vehicle::*;
