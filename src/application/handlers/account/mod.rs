//! Account handlers (GitHub sign-in and binding).

mod github_sign_in;

pub use github_sign_in::{BindGithubCommand, BindGithubHandler, GithubProfile, GithubSignInHandler};
