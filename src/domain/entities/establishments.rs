use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::establishments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = establishments)]
pub struct EstablishmentEntity {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub booking_enabled: bool,
    pub reschedule_min_hours: i32,
    pub max_future_days: i32,
    pub slot_interval_minutes: i32,
    pub buffer_minutes: i32,
    pub created_at: DateTime<Utc>,
}
