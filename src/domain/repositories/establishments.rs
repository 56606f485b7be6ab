use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::establishments::EstablishmentEntity;

#[async_trait]
#[automock]
pub trait EstablishmentRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<EstablishmentEntity>>;

    async fn find_by_id(&self, establishment_id: Uuid) -> Result<Option<EstablishmentEntity>>;
}
