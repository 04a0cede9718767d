//! Task-backed suggestion lookups.

mod suggestions;

pub use suggestions::{SuggestionError, SuggestionRequest, SuggestionResult, SuggestionService};
