//! Application layer (use-cases, policies).
//!
//! State machines and collections driven by the store. Nothing here performs IO; network and
//! timers live in `infra` and are reached through store commands.

pub mod analysis;
pub mod feed;
pub mod projects;
pub mod settings;
pub mod upload;
