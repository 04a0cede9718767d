//! Attempt-scoped values and the engine's error taxonomy.

mod capabilities;
mod context;
mod error;
mod phase;
mod receipt;

pub use capabilities::RequesterCapabilities;
pub use context::TransitionContext;
pub use error::{InvalidTransitionReason, MissingEntity, TransitionError, TransitionResult};
pub use phase::AttemptPhase;
pub use receipt::{
    PostFunctionOutcome, PostFunctionReport, PostFunctionStatus, SkipReason, TransitionReceipt,
};
