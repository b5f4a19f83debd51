//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod comment;
pub mod overview;
pub mod post;
pub mod subscription;

pub use account::{BindGithubCommand, BindGithubHandler, GithubProfile, GithubSignInHandler};
pub use comment::{AddCommentCommand, AddCommentHandler};
pub use overview::{DashboardHandler, DashboardStats, Sidebar, SidebarHandler};
pub use post::{
    DeletePostCommand, DeletePostHandler, GetPostHandler, GetPostQuery, ListArchivePostsHandler,
    ListArchivePostsQuery, ListPostsHandler, ListPostsQuery, ListingSettings, PostDetail, SavePostCommand,
    SavePostHandler, SavePostResult,
};
pub use subscription::{
    ConfirmSubscriptionHandler, SubscribeCommand, SubscribeHandler, SubscribeResult,
    SubscriptionTokenCommand, UnsubscribeHandler,
};
