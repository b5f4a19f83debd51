use async_trait::async_trait;
use std::collections::BTreeMap;

use super::{newest_first, not_found, InMemoryBlogStore, State};
use crate::domain::foundation::{ArchiveMonth, DomainError, ErrorCode, Page, PostId, TagId, Timestamp};
use crate::domain::post::{Archive, CommentedPost, NewPost, Post};
use crate::ports::{PostReader, PostRepository};

fn page_slice(mut posts: Vec<Post>, page: Option<Page>) -> Vec<Post> {
    posts.sort_by(newest_first);
    match page {
        Some(page) => posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect(),
        None => posts,
    }
}

fn published_with_tag(state: &State, tag: Option<TagId>) -> Vec<Post> {
    state
        .posts
        .values()
        .filter(|p| p.is_published())
        .filter(|p| tag.map_or(true, |t| state.post_has_tag(p.id(), t)))
        .cloned()
        .collect()
}

fn published_in_month(state: &State, month: ArchiveMonth) -> Vec<Post> {
    state
        .posts
        .values()
        .filter(|p| p.is_published() && p.created_at().archive_month() == month)
        .cloned()
        .collect()
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn insert(&self, post: &NewPost) -> Result<Post, DomainError> {
        Ok(self.insert_post_at(post.clone(), Timestamp::now()).await)
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post.id())
            .ok_or_else(|| not_found(ErrorCode::PostNotFound, "Post", post.id()))?;
        let view = stored.view();
        let created_at = *stored.created_at();
        *stored = Post::reconstitute(
            post.id(),
            post.title().to_string(),
            post.body().to_string(),
            view,
            post.is_published(),
            created_at,
            *post.updated_at(),
        );
        Ok(())
    }

    async fn update_view(&self, post: &Post) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post.id())
            .ok_or_else(|| not_found(ErrorCode::PostNotFound, "Post", post.id()))?;
        *stored = Post::reconstitute(
            stored.id(),
            stored.title().to_string(),
            stored.body().to_string(),
            post.view(),
            stored.is_published(),
            *stored.created_at(),
            *stored.updated_at(),
        );
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Err(not_found(ErrorCode::PostNotFound, "Post", id));
        }
        state.post_tags.retain(|(post_id, _)| *post_id != id);
        state.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.posts.len() as u64)
    }
}

#[async_trait]
impl PostReader for InMemoryBlogStore {
    async fn list_published(
        &self,
        tag: Option<TagId>,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        Ok(page_slice(published_with_tag(&state, tag), page))
    }

    async fn list_all(&self, tag: Option<TagId>) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        let posts = state
            .posts
            .values()
            .filter(|p| tag.map_or(true, |t| state.post_has_tag(p.id(), t)))
            .cloned()
            .collect();
        Ok(page_slice(posts, None))
    }

    async fn count_published(&self, tag: Option<TagId>) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(published_with_tag(&state, tag).len() as u64)
    }

    async fn most_viewed(&self, limit: u32) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        let mut posts = published_with_tag(&state, None);
        posts.sort_by(|a, b| b.view().cmp(&a.view()).then_with(|| b.id().cmp(&a.id())));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn most_commented(&self, limit: u32) -> Result<Vec<CommentedPost>, DomainError> {
        let state = self.state.read().await;
        let mut totals: BTreeMap<PostId, u64> = BTreeMap::new();
        for comment in state.comments.values() {
            *totals.entry(comment.post_id).or_default() += 1;
        }

        let mut ranked: Vec<CommentedPost> = totals
            .into_iter()
            .filter_map(|(post_id, comment_total)| {
                state
                    .posts
                    .get(&post_id)
                    .filter(|p| p.is_published())
                    .map(|post| CommentedPost {
                        post: post.clone(),
                        comment_total,
                    })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.comment_total
                .cmp(&a.comment_total)
                .then_with(|| b.post.id().cmp(&a.post.id()))
        });
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    async fn archives(&self) -> Result<Vec<Archive>, DomainError> {
        let state = self.state.read().await;
        let mut months: BTreeMap<ArchiveMonth, u64> = BTreeMap::new();
        for post in state.posts.values().filter(|p| p.is_published()) {
            *months.entry(post.created_at().archive_month()).or_default() += 1;
        }
        Ok(months
            .into_iter()
            .rev()
            .map(|(month, total)| Archive { month, total })
            .collect())
    }

    async fn list_by_archive(
        &self,
        month: ArchiveMonth,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        Ok(page_slice(published_in_month(&state, month), page))
    }

    async fn count_by_archive(&self, month: ArchiveMonth) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(published_in_month(&state, month).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comment::NewComment;
    use crate::domain::foundation::UserId;
    use crate::domain::tag::PostTag;
    use crate::domain::user::NewUser;
    use crate::ports::{CommentRepository, TagRepository, UserRepository};
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn draft(title: &str, published: bool) -> NewPost {
        NewPost::new(title, "body", published).unwrap()
    }

    async fn reader(store: &InMemoryBlogStore) -> UserId {
        store
            .first_or_create_by_github(&NewUser::from_github("octocat", "av", "gh").unwrap())
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn list_published_hides_drafts_and_orders_newest_first() {
        let store = InMemoryBlogStore::new();
        store.insert_post_at(draft("old", true), at(2020, 1, 1)).await;
        store.insert_post_at(draft("draft", false), at(2020, 2, 1)).await;
        store.insert_post_at(draft("new", true), at(2020, 3, 1)).await;

        let posts = store.list_published(None, None).await.unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["new", "old"]);

        let all = PostReader::list_all(&store, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(store.count_published(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn pagination_slices_results() {
        let store = InMemoryBlogStore::new();
        for day in 1..=5 {
            store
                .insert_post_at(draft(&format!("p{}", day), true), at(2021, 1, day))
                .await;
        }

        let page2 = store
            .list_published(None, Page::from_request(2, 2))
            .await
            .unwrap();
        let titles: Vec<_> = page2.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["p3", "p2"]);
    }

    #[tokio::test]
    async fn tag_filter_restricts_posts() {
        let store = InMemoryBlogStore::new();
        let tagged = store.insert_post_at(draft("tagged", true), at(2021, 1, 1)).await;
        store.insert_post_at(draft("plain", true), at(2021, 1, 2)).await;
        let tag = store.insert_or_get("rust").await.unwrap();
        store.attach(PostTag::new(tagged.id(), tag.id())).await.unwrap();

        let posts = store.list_published(Some(tag.id()), None).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title(), "tagged");
        assert_eq!(store.count_published(Some(tag.id())).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn archives_group_by_month_latest_first() {
        let store = InMemoryBlogStore::new();
        store.insert_post_at(draft("a", true), at(2019, 3, 1)).await;
        store.insert_post_at(draft("b", true), at(2019, 3, 20)).await;
        store.insert_post_at(draft("c", true), at(2019, 5, 2)).await;
        store.insert_post_at(draft("d", false), at(2019, 6, 2)).await;

        let archives = store.archives().await.unwrap();
        let rows: Vec<_> = archives.iter().map(|a| (a.month.to_string(), a.total)).collect();
        assert_eq!(rows, vec![("2019-05".to_string(), 1), ("2019-03".to_string(), 2)]);

        let march = ArchiveMonth::parse("2019", "3").unwrap();
        assert_eq!(store.count_by_archive(march).await.unwrap(), 2);
        let posts = store.list_by_archive(march, None).await.unwrap();
        assert_eq!(posts[0].title(), "b");
    }

    #[tokio::test]
    async fn most_viewed_ranks_by_view() {
        let store = InMemoryBlogStore::new();
        let mut low = store.insert_post_at(draft("low", true), at(2021, 1, 1)).await;
        let mut high = store.insert_post_at(draft("high", true), at(2021, 1, 2)).await;
        low.record_view();
        for _ in 0..3 {
            high.record_view();
        }
        store.update_view(&low).await.unwrap();
        store.update_view(&high).await.unwrap();

        let ranked = store.most_viewed(5).await.unwrap();
        assert_eq!(ranked[0].title(), "high");
        assert_eq!(ranked[0].view(), 3);
    }

    #[tokio::test]
    async fn most_commented_skips_uncommented_posts() {
        let store = InMemoryBlogStore::new();
        let a = store.insert_post_at(draft("a", true), at(2021, 1, 1)).await;
        let b = store.insert_post_at(draft("b", true), at(2021, 1, 2)).await;
        store.insert_post_at(draft("c", true), at(2021, 1, 3)).await;
        let user = reader(&store).await;
        for post in [a.id(), b.id(), b.id()] {
            CommentRepository::insert(&store, &NewComment::new(user, post, "hi").unwrap())
                .await
                .unwrap();
        }

        let ranked = store.most_commented(5).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].post.title(), "b");
        assert_eq!(ranked[0].comment_total, 2);
    }

    #[tokio::test]
    async fn update_keeps_view_counter() {
        let store = InMemoryBlogStore::new();
        let mut post = store.insert_post_at(draft("t", true), at(2021, 1, 1)).await;
        post.record_view();
        store.update_view(&post).await.unwrap();

        post.edit("renamed", "new body", false).unwrap();
        PostRepository::update(&store, &post).await.unwrap();

        let stored = PostRepository::find_by_id(&store, post.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), "renamed");
        assert_eq!(stored.view(), 1);
    }

    #[tokio::test]
    async fn delete_cascades_tags_and_comments() {
        let store = InMemoryBlogStore::new();
        let post = store.insert_post_at(draft("t", true), at(2021, 1, 1)).await;
        let tag = store.insert_or_get("x").await.unwrap();
        store.attach(PostTag::new(post.id(), tag.id())).await.unwrap();
        let user = reader(&store).await;
        CommentRepository::insert(&store, &NewComment::new(user, post.id(), "c").unwrap())
            .await
            .unwrap();

        PostRepository::delete(&store, post.id()).await.unwrap();

        assert!(TagRepository::list_by_post(&store, post.id())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(CommentRepository::count(&store).await.unwrap(), 0);
        let err = PostRepository::delete(&store, post.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PostNotFound);
    }
}
