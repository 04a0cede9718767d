//! Application service performing transition attempts.

mod executor;

pub use executor::{PerformTransitionRequest, TransitionCollaborators, TransitionExecutor};
