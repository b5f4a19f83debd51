//! DeletePostHandler - Command handler for removing posts.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, PostId};
use crate::ports::{PostRepository, TagRepository};

/// Command to delete a post.
#[derive(Debug, Clone, Copy)]
pub struct DeletePostCommand {
    pub id: PostId,
}

/// Handler for deleting posts and their tag links.
pub struct DeletePostHandler {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl DeletePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { posts, tags }
    }

    pub async fn handle(&self, cmd: DeletePostCommand) -> Result<(), DomainError> {
        self.tags.detach_all(cmd.id).await?;
        self.posts.delete(cmd.id).await?;
        info!(post_id = %cmd.id, "Deleted post");
        Ok(())
    }
}
