use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{punctual_time_blocks, recurring_time_blocks};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = recurring_time_blocks)]
pub struct RecurringTimeBlockEntity {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub active: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = punctual_time_blocks)]
pub struct PunctualTimeBlockEntity {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: Option<String>,
}
