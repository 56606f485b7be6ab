use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    entities::establishments::EstablishmentEntity,
    repositories::establishments::EstablishmentRepository,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, schema::establishments,
};

pub struct EstablishmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl EstablishmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl EstablishmentRepository for EstablishmentPostgres {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<EstablishmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = establishments::table
            .filter(establishments::slug.eq(slug))
            .select(EstablishmentEntity::as_select())
            .first::<EstablishmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, establishment_id: Uuid) -> Result<Option<EstablishmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = establishments::table
            .find(establishment_id)
            .select(EstablishmentEntity::as_select())
            .first::<EstablishmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
