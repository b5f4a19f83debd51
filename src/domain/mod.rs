//! Domain layer containing blog entities and value objects.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, pagination, errors)
//! - `post` - Posts, excerpts and archive/ranking rows
//! - `tag` - Tags and post↔tag links
//! - `user` - Administrator and reader accounts
//! - `comment` - Reader comments
//! - `subscriber` - Newsletter subscribers and their signed tokens
//! - `link` - Blogroll entries
//! - `app_data` - Named blobs for client apps

pub mod app_data;
pub mod comment;
pub mod foundation;
pub mod link;
pub mod post;
pub mod subscriber;
pub mod tag;
pub mod user;
