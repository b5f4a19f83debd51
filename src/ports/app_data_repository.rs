//! App data repository port.

use crate::domain::app_data::AppData;
use crate::domain::foundation::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait AppDataRepository: Send + Sync {
    /// Create or replace the blob stored under `name`.
    async fn upsert(&self, name: &str, data: &str) -> Result<AppData, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<AppData>, DomainError>;
}
