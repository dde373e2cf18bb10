//! DebugFlow client core: project upload workflow, realtime backend channel and activity feed.

pub mod app;
pub mod application;
pub mod domain;
pub mod infra;
