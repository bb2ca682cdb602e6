//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Aggregates: Consistency boundaries
//! - Entities: Objects with identity
//! - Domain Services: Operations that don't fit in a single aggregate
//! - Repository Interfaces: Ports for persistence

pub mod album;
pub mod follow;
pub mod playlist;
pub mod shared;
pub mod song;
pub mod user;

// Re-export commonly used types
pub use shared::{DomainError, Result};
