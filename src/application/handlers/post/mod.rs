//! Post command and query handlers.

mod delete_post;
mod get_post;
mod list_archive_posts;
mod list_posts;
mod save_post;

pub use delete_post::{DeletePostCommand, DeletePostHandler};
pub use get_post::{GetPostHandler, GetPostQuery, PostDetail};
pub use list_archive_posts::{ListArchivePostsHandler, ListArchivePostsQuery};
pub use list_posts::{ListPostsHandler, ListPostsQuery, ListingSettings};
pub use save_post::{SavePostCommand, SavePostHandler, SavePostResult};
