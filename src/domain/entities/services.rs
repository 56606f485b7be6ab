use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::services;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = services)]
pub struct ServiceEntity {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub active: bool,
}
