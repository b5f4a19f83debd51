use async_trait::async_trait;

use super::{conflict, not_found, InMemoryBlogStore};
use crate::domain::app_data::{validate_app_data_name, AppData};
use crate::domain::foundation::{DomainError, ErrorCode, LinkId, Timestamp};
use crate::domain::link::{validate_url, Link, NewLink};
use crate::ports::{AppDataRepository, LinkRepository};

#[async_trait]
impl LinkRepository for InMemoryBlogStore {
    async fn insert_or_get(&self, link: &NewLink) -> Result<Link, DomainError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.links.values().find(|l| l.url == link.url) {
            return Ok(existing.clone());
        }
        let id = LinkId::from_db(state.next_id());
        let stored = Link::from_new(id, link.clone(), Timestamp::now());
        state.links.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, link: &Link) -> Result<(), DomainError> {
        let url = validate_url(&link.url)?;
        let mut state = self.state.write().await;
        if state.links.values().any(|l| l.id != link.id && l.url == url) {
            return Err(conflict(format!("Link already exists: {}", url)));
        }
        let stored = state
            .links
            .get_mut(&link.id)
            .ok_or_else(|| not_found(ErrorCode::LinkNotFound, "Link", link.id))?;
        *stored = Link {
            url,
            updated_at: Timestamp::now(),
            ..link.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: LinkId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state
            .links
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(ErrorCode::LinkNotFound, "Link", id))
    }

    async fn list(&self) -> Result<Vec<Link>, DomainError> {
        let state = self.state.read().await;
        let mut links: Vec<Link> = state.links.values().cloned().collect();
        links.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.id.cmp(&b.id)));
        Ok(links)
    }

    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, DomainError> {
        Ok(self.state.read().await.links.get(&id).cloned())
    }
}

#[async_trait]
impl AppDataRepository for InMemoryBlogStore {
    async fn upsert(&self, name: &str, data: &str) -> Result<AppData, DomainError> {
        let name = validate_app_data_name(name)?;
        let record = AppData {
            name: name.clone(),
            data: data.to_string(),
            updated_at: Timestamp::now(),
        };
        self.state
            .write()
            .await
            .app_data
            .insert(name, record.clone());
        Ok(record)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AppData>, DomainError> {
        Ok(self.state.read().await.app_data.get(name.trim()).cloned())
    }
}
