use async_trait::async_trait;
use std::collections::BTreeMap;

use super::{conflict, not_found, InMemoryBlogStore};
use crate::domain::foundation::{DomainError, ErrorCode, PostId, TagId, Timestamp};
use crate::domain::tag::{normalize_tag_name, PostTag, Tag, TagUsage};
use crate::ports::TagRepository;

fn by_name(tags: &mut [Tag]) {
    tags.sort_by(|a, b| a.name().cmp(b.name()));
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn insert_or_get(&self, name: &str) -> Result<Tag, DomainError> {
        let name = normalize_tag_name(name)?;
        let mut state = self.state.write().await;
        if let Some(existing) = state.tags.values().find(|t| t.name() == name) {
            return Ok(existing.clone());
        }
        let id = TagId::from_db(state.next_id());
        let now = Timestamp::now();
        let tag = Tag::reconstitute(id, name, now, now);
        state.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: &Tag) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state
            .tags
            .values()
            .any(|t| t.id() != tag.id() && t.name() == tag.name())
        {
            return Err(conflict(format!("Tag name already in use: {}", tag.name())));
        }
        let stored = state
            .tags
            .get_mut(&tag.id())
            .ok_or_else(|| not_found(ErrorCode::TagNotFound, "Tag", tag.id()))?;
        *stored = tag.clone();
        Ok(())
    }

    async fn delete(&self, id: TagId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.tags.remove(&id).is_none() {
            return Err(not_found(ErrorCode::TagNotFound, "Tag", id));
        }
        state.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, DomainError> {
        Ok(self.state.read().await.tags.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Tag>, DomainError> {
        let mut tags: Vec<Tag> = self.state.read().await.tags.values().cloned().collect();
        by_name(&mut tags);
        Ok(tags)
    }

    async fn list_published_usage(&self) -> Result<Vec<TagUsage>, DomainError> {
        let state = self.state.read().await;
        let mut totals: BTreeMap<TagId, u64> = BTreeMap::new();
        for (post_id, tag_id) in &state.post_tags {
            if state.posts.get(post_id).is_some_and(|p| p.is_published()) {
                *totals.entry(*tag_id).or_default() += 1;
            }
        }
        let mut usage: Vec<TagUsage> = totals
            .into_iter()
            .filter_map(|(tag_id, total)| {
                state.tags.get(&tag_id).map(|tag| TagUsage {
                    tag: tag.clone(),
                    total,
                })
            })
            .collect();
        usage.sort_by(|a, b| a.tag.name().cmp(b.tag.name()));
        Ok(usage)
    }

    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<Tag>, DomainError> {
        let state = self.state.read().await;
        let mut tags: Vec<Tag> = state
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, tag_id)| state.tags.get(tag_id).cloned())
            .collect();
        by_name(&mut tags);
        Ok(tags)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.tags.len() as u64)
    }

    async fn attach(&self, link: PostTag) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&link.post_id) {
            return Err(not_found(ErrorCode::PostNotFound, "Post", link.post_id));
        }
        if !state.tags.contains_key(&link.tag_id) {
            return Err(not_found(ErrorCode::TagNotFound, "Tag", link.tag_id));
        }
        state.post_tags.insert((link.post_id, link.tag_id));
        Ok(())
    }

    async fn detach_all(&self, post_id: PostId) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .post_tags
            .retain(|(p, _)| *p != post_id);
        Ok(())
    }
}
