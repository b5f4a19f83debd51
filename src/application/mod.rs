//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (save, delete, comment, subscribe) are kept apart from
//! query handlers (post pages, listings, sidebar, dashboard).

pub mod handlers;

pub use handlers::{
    // Post handlers
    DeletePostCommand, DeletePostHandler, GetPostHandler, GetPostQuery,
    ListArchivePostsHandler, ListArchivePostsQuery, ListPostsHandler, ListPostsQuery, ListingSettings,
    PostDetail, SavePostCommand, SavePostHandler, SavePostResult,
    // Overview handlers
    DashboardHandler, DashboardStats, Sidebar, SidebarHandler,
    // Comment handlers
    AddCommentCommand, AddCommentHandler,
    // Subscription handlers
    ConfirmSubscriptionHandler, SubscribeCommand, SubscribeHandler, SubscribeResult,
    SubscriptionTokenCommand, UnsubscribeHandler,
    // Account handlers
    BindGithubCommand, BindGithubHandler, GithubProfile, GithubSignInHandler,
};
