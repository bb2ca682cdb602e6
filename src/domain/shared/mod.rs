//! Shared kernel - Common types used across all bounded contexts

pub mod error;
pub mod pagination;
pub mod result;

pub use error::DomainError;
pub use pagination::{Page, PageRequest, Pagination, SortDirection};
pub use result::Result;
