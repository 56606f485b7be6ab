use chrono::NaiveTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::business_hours;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = business_hours)]
pub struct BusinessHoursEntity {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub weekday: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub closed: bool,
}
