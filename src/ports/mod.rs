//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the storage layer. Adapters implement these ports.
//!
//! ## Repository Ports (write side + keyed lookups)
//!
//! - `PostRepository`, `TagRepository`, `UserRepository`, `CommentRepository`
//! - `SubscriberRepository`, `LinkRepository`, `AppDataRepository`
//!
//! ## Reader Ports (aggregate queries)
//!
//! - `PostReader` - Listing, archives and rankings

mod app_data_repository;
mod comment_repository;
mod link_repository;
mod post_reader;
mod post_repository;
mod subscriber_repository;
mod tag_repository;
mod user_repository;

pub use app_data_repository::AppDataRepository;
pub use comment_repository::CommentRepository;
pub use link_repository::LinkRepository;
pub use post_reader::{PostReader, DEFAULT_RANKING_LIMIT};
pub use post_repository::PostRepository;
pub use subscriber_repository::SubscriberRepository;
pub use tag_repository::TagRepository;
pub use user_repository::UserRepository;
