//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Repository implementations (in-memory and Postgres)
//! - Database connection management

pub mod persistence;
