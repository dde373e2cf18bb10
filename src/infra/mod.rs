//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (realtime channel, HTTP, config files).

pub mod api;
pub mod app_config;
pub mod realtime;
pub mod submit;
