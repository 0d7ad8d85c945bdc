pub mod candidates;
pub mod rng;
pub mod search;

pub use candidates::{CandidateSource, RandomCandidates};
pub use rng::Rng;
pub use search::{Plan, SearchStatus, ShotSearch};
