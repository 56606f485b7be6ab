use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    entities::{
        business_hours::BusinessHoursEntity,
        time_blocks::{PunctualTimeBlockEntity, RecurringTimeBlockEntity},
    },
    repositories::availability::AvailabilityRepository,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{business_hours, punctual_time_blocks, recurring_time_blocks},
};

pub struct AvailabilityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AvailabilityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AvailabilityRepository for AvailabilityPostgres {
    async fn business_hours_for_weekday(
        &self,
        establishment_id: Uuid,
        weekday: i16,
    ) -> Result<Option<BusinessHoursEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = business_hours::table
            .filter(business_hours::establishment_id.eq(establishment_id))
            .filter(business_hours::weekday.eq(weekday))
            .select(BusinessHoursEntity::as_select())
            .first::<BusinessHoursEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn recurring_blocks_for_weekday(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        weekday: i16,
    ) -> Result<Vec<RecurringTimeBlockEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = recurring_time_blocks::table
            .filter(recurring_time_blocks::establishment_id.eq(establishment_id))
            .filter(recurring_time_blocks::weekday.eq(weekday))
            .filter(recurring_time_blocks::active.eq(true))
            .filter(
                recurring_time_blocks::professional_id
                    .is_null()
                    .or(recurring_time_blocks::professional_id.eq(professional_id)),
            )
            .select(RecurringTimeBlockEntity::as_select())
            .load::<RecurringTimeBlockEntity>(&mut conn)?;

        Ok(results)
    }

    async fn punctual_blocks_between(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PunctualTimeBlockEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = punctual_time_blocks::table
            .filter(punctual_time_blocks::establishment_id.eq(establishment_id))
            .filter(punctual_time_blocks::start_at.lt(to))
            .filter(punctual_time_blocks::end_at.gt(from))
            .filter(
                punctual_time_blocks::professional_id
                    .is_null()
                    .or(punctual_time_blocks::professional_id.eq(professional_id)),
            )
            .select(PunctualTimeBlockEntity::as_select())
            .load::<PunctualTimeBlockEntity>(&mut conn)?;

        Ok(results)
    }
}
