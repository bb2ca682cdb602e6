//! User domain

pub mod entity;
pub mod repository;

pub use entity::{CreateUser, UpdateProfile, User, UserRole};
pub use repository::{UserFilters, UserRepository, UserSortField};
