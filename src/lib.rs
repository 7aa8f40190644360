//! Jellydigest - newsletter of recently added Jellyfin movies and episodes
//!
//! This library crate exposes the core functionality for integration testing.

pub mod collector;
pub mod config;
pub mod delivery;
pub mod digest;
pub mod job;
pub mod library;
pub mod metadata;
pub mod render;
