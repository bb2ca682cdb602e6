//! Follow domain

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{FollowEdge, FollowStatus};
pub use repository::FollowRepository;
pub use service::FollowService;
