pub mod outcome;
pub mod run;

pub use outcome::{BallMovement, BallView, FirstContact, ShotOutcome};
pub use run::{RunState, SimulationRun};
