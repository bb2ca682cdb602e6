//! SoundWave - A music streaming backend built with Rust
//!
//! This is a Domain-Driven Design (DDD) implementation of a streaming
//! service API covering users, follows, songs, albums and playlists.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
