use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    business_hours::BusinessHoursEntity,
    time_blocks::{PunctualTimeBlockEntity, RecurringTimeBlockEntity},
};

/// Weekly hours and closure blocks, always scoped to one establishment.
/// Block queries return establishment-wide blocks (null professional)
/// plus those targeting the given professional.
#[async_trait]
#[automock]
pub trait AvailabilityRepository {
    async fn business_hours_for_weekday(
        &self,
        establishment_id: Uuid,
        weekday: i16,
    ) -> Result<Option<BusinessHoursEntity>>;

    async fn recurring_blocks_for_weekday(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        weekday: i16,
    ) -> Result<Vec<RecurringTimeBlockEntity>>;

    async fn punctual_blocks_between(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PunctualTimeBlockEntity>>;
}
