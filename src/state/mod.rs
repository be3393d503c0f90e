//! Workspace state management modules.

mod collection;
mod problems;
mod submission;

pub use collection::{ImageCollection, LoadedImage};
pub use problems::{ProblemList, SelectAllState};
pub use submission::SubmissionState;
