//! Domain types for the DebugFlow client.
//! Defines the data structures shared by the workflow, the store and the backend adapters.

pub mod activity;
pub mod analysis;
pub mod error;
pub mod integration;
pub mod project;
pub mod upload;

pub use activity::*;
pub use analysis::*;
pub use error::*;
pub use integration::*;
pub use project::*;
pub use upload::*;
