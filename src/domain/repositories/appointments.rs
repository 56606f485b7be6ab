use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::appointments::{AppointmentEntity, InsertAppointmentEntity};
use crate::domain::value_objects::appointments::AppointmentDetailDto;

#[async_trait]
#[automock]
pub trait AppointmentRepository {
    /// Booked/confirmed appointments of one professional intersecting
    /// `[from, to)`.
    async fn list_occupying_between(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AppointmentEntity>>;

    /// Non-canceled appointments of the establishment in `[from, to)`,
    /// used for the monthly quota.
    async fn count_non_canceled_between(
        &self,
        establishment_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64>;

    /// Inserts inside a serializable transaction that re-counts occupancy.
    /// Returns `None` when the slot was lost to a concurrent booking.
    async fn insert_checked(
        &self,
        entity: InsertAppointmentEntity,
        capacity: i32,
    ) -> Result<Option<Uuid>>;

    /// Moves an appointment under the same occupancy re-check as insert.
    /// Returns `false` when the new slot was lost to a concurrent booking.
    async fn reschedule_checked(
        &self,
        appointment_id: Uuid,
        new_start_at: DateTime<Utc>,
        new_end_at: DateTime<Utc>,
        capacity: i32,
    ) -> Result<bool>;

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<AppointmentEntity>>;

    async fn find_detail_by_token(
        &self,
        establishment_id: Uuid,
        manage_token: &str,
    ) -> Result<Option<AppointmentDetailDto>>;

    async fn set_canceled(&self, appointment_id: Uuid) -> Result<()>;

    async fn set_confirmed(&self, appointment_id: Uuid) -> Result<()>;

    async fn set_completed(
        &self,
        appointment_id: Uuid,
        completed_by: Option<String>,
    ) -> Result<()>;
}
