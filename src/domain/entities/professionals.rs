use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::professionals;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = professionals)]
pub struct ProfessionalEntity {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub active: bool,
}
