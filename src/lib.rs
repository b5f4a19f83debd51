//! spblog - data-access layer of a personal blog
//!
//! Posts with tags and Markdown bodies, reader comments, GitHub-backed
//! accounts, newsletter subscribers with signed confirmation tokens, a
//! blogroll, and the archive/ranking queries behind the sidebar.
//!
//! The crate follows a ports-and-adapters layout: `domain` holds entities and
//! validation, `ports` the storage traits, `adapters` the PostgreSQL and
//! in-memory implementations, and `application` the handlers composing them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
