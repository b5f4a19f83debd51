//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to storage:
//! - `memory` - One in-process store implementing every port (tests, development)
//! - `postgres` - PostgreSQL repositories and readers

pub mod memory;
pub mod postgres;

pub use memory::InMemoryBlogStore;
pub use postgres::{
    run_migrations, PostgresAppDataRepository, PostgresCommentRepository,
    PostgresLinkRepository, PostgresPostReader, PostgresPostRepository,
    PostgresSubscriberRepository, PostgresTagRepository, PostgresUserRepository,
};
