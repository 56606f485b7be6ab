use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{dsl::count_star, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::appointments::{AppointmentEntity, InsertAppointmentEntity},
    repositories::appointments::AppointmentRepository,
    value_objects::{
        appointments::AppointmentDetailDto, enums::appointment_statuses::AppointmentStatus,
    },
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{appointments, establishments, professionals, services},
};

pub struct AppointmentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AppointmentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// A unique-violation (the capacity-1 partial index on
/// `(professional_id, start_at)`) or a serialization failure both mean the
/// slot was lost to a concurrent writer.
fn is_lost_race(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            | DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _)
    )
}

#[async_trait]
impl AppointmentRepository for AppointmentPostgres {
    async fn list_occupying_between(
        &self,
        establishment_id: Uuid,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AppointmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = appointments::table
            .filter(appointments::establishment_id.eq(establishment_id))
            .filter(appointments::professional_id.eq(professional_id))
            .filter(appointments::status.eq_any(AppointmentStatus::occupying()))
            .filter(appointments::start_at.lt(to))
            .filter(appointments::end_at.gt(from))
            .order(appointments::start_at.asc())
            .select(AppointmentEntity::as_select())
            .load::<AppointmentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_non_canceled_between(
        &self,
        establishment_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = appointments::table
            .filter(appointments::establishment_id.eq(establishment_id))
            .filter(appointments::status.ne(AppointmentStatus::Canceled.to_string()))
            .filter(appointments::start_at.ge(from))
            .filter(appointments::start_at.lt(to))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn insert_checked(
        &self,
        entity: InsertAppointmentEntity,
        capacity: i32,
    ) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn
            .build_transaction()
            .serializable()
            .run::<Option<Uuid>, DieselError, _>(|tx| {
                let occupancy: i64 = appointments::table
                    .filter(appointments::establishment_id.eq(entity.establishment_id))
                    .filter(appointments::professional_id.eq(entity.professional_id))
                    .filter(appointments::status.eq_any(AppointmentStatus::occupying()))
                    .filter(appointments::start_at.lt(entity.end_at))
                    .filter(appointments::end_at.gt(entity.start_at))
                    .select(count_star())
                    .first(tx)?;

                if occupancy >= capacity as i64 {
                    return Ok(None);
                }

                let appointment_id = insert_into(appointments::table)
                    .values(&entity)
                    .returning(appointments::id)
                    .get_result::<Uuid>(tx)?;

                Ok(Some(appointment_id))
            });

        match result {
            Ok(outcome) => Ok(outcome),
            Err(err) if is_lost_race(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn reschedule_checked(
        &self,
        appointment_id: Uuid,
        new_start_at: DateTime<Utc>,
        new_end_at: DateTime<Utc>,
        capacity: i32,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn
            .build_transaction()
            .serializable()
            .run::<bool, DieselError, _>(|tx| {
                let current = appointments::table
                    .find(appointment_id)
                    .select(AppointmentEntity::as_select())
                    .first::<AppointmentEntity>(tx)?;

                let occupancy: i64 = appointments::table
                    .filter(appointments::establishment_id.eq(current.establishment_id))
                    .filter(appointments::professional_id.eq(current.professional_id))
                    .filter(appointments::id.ne(appointment_id))
                    .filter(appointments::status.eq_any(AppointmentStatus::occupying()))
                    .filter(appointments::start_at.lt(new_end_at))
                    .filter(appointments::end_at.gt(new_start_at))
                    .select(count_star())
                    .first(tx)?;

                if occupancy >= capacity as i64 {
                    return Ok(false);
                }

                update(appointments::table)
                    .filter(appointments::id.eq(appointment_id))
                    .set((
                        appointments::start_at.eq(new_start_at),
                        appointments::end_at.eq(new_end_at),
                        appointments::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)?;

                Ok(true)
            });

        match result {
            Ok(moved) => Ok(moved),
            Err(err) if is_lost_race(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<AppointmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = appointments::table
            .find(appointment_id)
            .select(AppointmentEntity::as_select())
            .first::<AppointmentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_detail_by_token(
        &self,
        establishment_id: Uuid,
        manage_token: &str,
    ) -> Result<Option<AppointmentDetailDto>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = appointments::table
            .inner_join(establishments::table)
            .inner_join(services::table)
            .inner_join(professionals::table)
            .filter(appointments::establishment_id.eq(establishment_id))
            .filter(appointments::manage_token.eq(manage_token))
            .select((
                AppointmentEntity::as_select(),
                establishments::name,
                establishments::slug,
                establishments::reschedule_min_hours,
                services::name,
                services::duration_minutes,
                professionals::name,
            ))
            .first::<(AppointmentEntity, String, String, i32, String, i32, String)>(&mut conn)
            .optional()?;

        Ok(row.map(
            |(
                appointment,
                establishment_name,
                establishment_slug,
                reschedule_min_hours,
                service_name,
                service_duration_minutes,
                professional_name,
            )| AppointmentDetailDto {
                id: appointment.id,
                status: appointment.status,
                start_at: appointment.start_at,
                end_at: appointment.end_at,
                customer_name: appointment.customer_name,
                customer_phone: appointment.customer_phone,
                customer_email: appointment.customer_email,
                notes: appointment.notes,
                establishment_name,
                establishment_slug,
                service_name,
                service_duration_minutes,
                professional_name,
                reschedule_min_hours,
            },
        ))
    }

    async fn set_canceled(&self, appointment_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(appointments::table)
            .filter(appointments::id.eq(appointment_id))
            .set((
                appointments::status.eq(AppointmentStatus::Canceled.to_string()),
                appointments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn set_confirmed(&self, appointment_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(appointments::table)
            .filter(appointments::id.eq(appointment_id))
            .set((
                appointments::status.eq(AppointmentStatus::Confirmed.to_string()),
                appointments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn set_completed(
        &self,
        appointment_id: Uuid,
        completed_by: Option<String>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        update(appointments::table)
            .filter(appointments::id.eq(appointment_id))
            .set((
                appointments::status.eq(AppointmentStatus::Completed.to_string()),
                appointments::completed_at.eq(Some(now)),
                appointments::completed_by.eq(completed_by),
                appointments::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
