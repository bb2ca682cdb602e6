//! Interface layer - External interfaces (REST API)
//!
//! This layer handles:
//! - REST API endpoints
//! - Request/response formatting

pub mod api;
