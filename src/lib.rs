//! pixdesk - interactive image workspace controller
//!
//! Loads images into an owned collection, pans and zooms them in a stepped
//! viewport, tracks annotation problem slots and submits images to a remote
//! analysis/generation service with upload progress. A UI layer drives a
//! [`Workspace`] with input events and renders its state.

pub mod config;
pub mod constants;
pub mod dialog;
pub mod error;
pub mod mode;
pub mod model;
pub mod notice;
pub mod pipeline;
pub mod resource;
pub mod state;
pub mod widget_state;
pub mod workspace;
pub mod zoom_math;

#[cfg(test)]
mod test_image;
#[cfg(test)]
mod test_transport;

pub use config::WorkspaceConfig;
pub use error::{ErrorInfo, ErrorKind, WorkspaceError};
pub use workspace::{Workspace, WorkspaceEvent};
