//! Link repository port.

use crate::domain::foundation::{DomainError, LinkId};
use crate::domain::link::{Link, NewLink};
use async_trait::async_trait;

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Return the link with `link.url`, creating it if needed.
    async fn insert_or_get(&self, link: &NewLink) -> Result<Link, DomainError>;

    /// Persist name, url and sort order.
    ///
    /// # Errors
    ///
    /// - `LinkNotFound` if the link doesn't exist
    async fn save(&self, link: &Link) -> Result<(), DomainError>;

    async fn delete(&self, id: LinkId) -> Result<(), DomainError>;

    /// Every link by `sort` ascending.
    async fn list(&self) -> Result<Vec<Link>, DomainError>;

    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn LinkRepository) {}
    }
}
