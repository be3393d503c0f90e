//! Data models for the pixdesk workspace.

mod problem;

pub use problem::{Problem, ProblemId};
