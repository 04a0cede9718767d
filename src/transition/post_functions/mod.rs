//! Interpretation of a transition's post-function list.

mod runner;
mod template;

pub use runner::{PostFunctionInput, PostFunctionRunner};
