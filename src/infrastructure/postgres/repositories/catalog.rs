use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{dsl::count_star, prelude::*};
use uuid::Uuid;

use crate::domain::{
    entities::{professionals::ProfessionalEntity, services::ServiceEntity},
    repositories::catalog::CatalogRepository,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{professionals, services},
};

pub struct CatalogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CatalogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CatalogRepository for CatalogPostgres {
    async fn find_active_professional(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<ProfessionalEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = professionals::table
            .filter(professionals::establishment_id.eq(establishment_id))
            .filter(professionals::id.eq(professional_id))
            .filter(professionals::active.eq(true))
            .select(ProfessionalEntity::as_select())
            .first::<ProfessionalEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_active_service(
        &self,
        establishment_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<ServiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = services::table
            .filter(services::establishment_id.eq(establishment_id))
            .filter(services::id.eq(service_id))
            .filter(services::active.eq(true))
            .select(ServiceEntity::as_select())
            .first::<ServiceEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn count_active_professionals(&self, establishment_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = professionals::table
            .filter(professionals::establishment_id.eq(establishment_id))
            .filter(professionals::active.eq(true))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total)
    }
}
