//! Inputs and outputs of the suggestion scorer.

mod input;
mod suggestion;

pub use input::{CandidateTarget, HistoryEntry, SuggestionInput, TransitionCandidate};
pub use suggestion::{Confidence, TransitionSuggestion};
