use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{professionals::ProfessionalEntity, services::ServiceEntity};

/// Professionals and services, always scoped to one establishment.
#[async_trait]
#[automock]
pub trait CatalogRepository {
    async fn find_active_professional(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<ProfessionalEntity>>;

    async fn find_active_service(
        &self,
        establishment_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<ServiceEntity>>;

    async fn count_active_professionals(&self, establishment_id: Uuid) -> Result<i64>;
}
