//! User module - administrator and reader accounts.

mod account;

pub use account::{non_blank, validate_email, NewUser, User};
