use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::usecases::{calendar, entitlement, slots};
use crate::domain::{
    entities::{
        appointments::{AppointmentEntity, InsertAppointmentEntity},
        establishments::EstablishmentEntity,
        professionals::ProfessionalEntity,
        services::ServiceEntity,
    },
    repositories::{
        appointments::AppointmentRepository, availability::AvailabilityRepository,
        catalog::CatalogRepository, establishments::EstablishmentRepository,
        notifications::NotificationGateway, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        appointments::{
            AppointmentDetailDto, BookingConfirmationDto, BookingNotification,
            CreateAppointmentModel,
        },
        availability::{AvailableSlotsDto, SlotQueryModel},
        entitlement::{CanAcceptDto, EntitlementReason},
        enums::appointment_statuses::AppointmentStatus,
    },
};

const MANAGE_TOKEN_LEN: usize = 48;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("booking not allowed: {0}")]
    EntitlementDenied(EntitlementReason),

    #[error("the requested slot is no longer available")]
    SlotUnavailable,

    #[error("invalid manage token")]
    InvalidToken,

    #[error("not found")]
    NotFound,

    #[error("appointments can only be changed up to {min_hours} hours before they start")]
    NotModifiable { min_hours: i32 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::EntitlementDenied(_) => StatusCode::FORBIDDEN,
            BookingError::SlotUnavailable => StatusCode::CONFLICT,
            BookingError::InvalidToken => StatusCode::UNAUTHORIZED,
            BookingError::NotFound => StatusCode::NOT_FOUND,
            BookingError::NotModifiable { .. } => StatusCode::CONFLICT,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type BookingResult<T> = std::result::Result<T, BookingError>;

/// True while the appointment may still be rescheduled or canceled.
pub fn within_modification_window(
    start_at: DateTime<Utc>,
    reschedule_min_hours: i32,
    now: DateTime<Utc>,
) -> bool {
    now < start_at - TimeDelta::hours(reschedule_min_hours as i64)
}

fn generate_manage_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MANAGE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Orchestrates the public booking flow: availability listing, entitlement
/// gating and the transactional appointment mutations.
pub struct BookingUseCase<E, C, Av, Ap, P, S, N>
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    establishment_repo: Arc<E>,
    catalog_repo: Arc<C>,
    availability_repo: Arc<Av>,
    appointment_repo: Arc<Ap>,
    plan_resolver: Arc<entitlement::PlanResolver<P, S>>,
    notifier: Arc<N>,
}

impl<E, C, Av, Ap, P, S, N> BookingUseCase<E, C, Av, Ap, P, S, N>
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    pub fn new(
        establishment_repo: Arc<E>,
        catalog_repo: Arc<C>,
        availability_repo: Arc<Av>,
        appointment_repo: Arc<Ap>,
        plan_resolver: Arc<entitlement::PlanResolver<P, S>>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            establishment_repo,
            catalog_repo,
            availability_repo,
            appointment_repo,
            plan_resolver,
            notifier,
        }
    }

    pub async fn list_available_slots(
        &self,
        slug: &str,
        query: SlotQueryModel,
    ) -> BookingResult<AvailableSlotsDto> {
        info!(slug, date = %query.date, "booking: slot listing requested");
        let establishment = self.resolve_bookable_establishment(slug).await?;
        let professional = self
            .load_professional(&establishment, query.professional_id)
            .await?;
        let service = self.load_service(&establishment, query.service_id).await?;

        let starts = self
            .open_starts(
                &establishment,
                &professional,
                &service,
                query.date,
                None,
                Utc::now(),
            )
            .await?;

        Ok(AvailableSlotsDto {
            date: query.date,
            slots: starts.into_iter().map(slots::format_hhmm).collect(),
        })
    }

    pub async fn can_accept_bookings(&self, slug: &str) -> BookingResult<CanAcceptDto> {
        let establishment = match self.establishment_repo.find_by_slug(slug).await? {
            Some(establishment) => establishment,
            None => {
                warn!(slug, "booking: can-accept check for unknown establishment");
                return Ok(CanAcceptDto::reject(EntitlementReason::NoEstablishment));
            }
        };

        // A disabled booking page answers like an unpublished one, matching
        // the 404 the other operations return.
        if !establishment.booking_enabled {
            warn!(slug, "booking: can-accept check while online booking is disabled");
            return Ok(CanAcceptDto::reject(EntitlementReason::NoEstablishment));
        }

        match self.booking_entitlement(&establishment).await? {
            Some(reason) => Ok(CanAcceptDto::reject(reason)),
            None => Ok(CanAcceptDto::accept()),
        }
    }

    pub async fn create_appointment(
        &self,
        slug: &str,
        model: CreateAppointmentModel,
    ) -> BookingResult<BookingConfirmationDto> {
        info!(
            slug,
            professional_id = %model.professional_id,
            service_id = %model.service_id,
            start_at = %model.start_at,
            "booking: create appointment requested"
        );

        if model.customer_name.trim().is_empty() {
            return Err(BookingError::Validation("customer name is required".to_string()));
        }
        if model.customer_phone.trim().is_empty() {
            return Err(BookingError::Validation("customer phone is required".to_string()));
        }

        let establishment = self.resolve_bookable_establishment(slug).await?;

        if let Some(reason) = self.booking_entitlement(&establishment).await? {
            warn!(
                slug,
                reason = %reason,
                "booking: create rejected by entitlement"
            );
            return Err(BookingError::EntitlementDenied(reason));
        }

        let professional = self
            .load_professional(&establishment, model.professional_id)
            .await?;
        let service = self.load_service(&establishment, model.service_id).await?;

        let now = Utc::now();
        self.ensure_slot_offerable(
            &establishment,
            &professional,
            &service,
            model.start_at,
            None,
            now,
        )
        .await?;

        let end_at = model.start_at + TimeDelta::minutes(service.duration_minutes as i64);
        let manage_token = generate_manage_token();
        let entity = InsertAppointmentEntity {
            establishment_id: establishment.id,
            professional_id: professional.id,
            service_id: service.id,
            customer_name: model.customer_name.trim().to_string(),
            customer_phone: model.customer_phone.trim().to_string(),
            customer_email: model.customer_email,
            notes: model.notes,
            start_at: model.start_at,
            end_at,
            status: AppointmentStatus::Booked.to_string(),
            manage_token: manage_token.clone(),
        };

        let appointment_id = self
            .appointment_repo
            .insert_checked(entity, professional.capacity)
            .await
            .map_err(|err| {
                error!(slug, db_error = ?err, "booking: appointment insert failed");
                BookingError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    slug,
                    professional_id = %professional.id,
                    start_at = %model.start_at,
                    "booking: slot lost to a concurrent booking"
                );
                BookingError::SlotUnavailable
            })?;

        info!(
            slug,
            %appointment_id,
            start_at = %model.start_at,
            "booking: appointment created"
        );

        self.dispatch_created(BookingNotification {
            appointment_id,
            establishment_id: establishment.id,
            customer_name: model.customer_name.trim().to_string(),
            customer_phone: model.customer_phone.trim().to_string(),
            start_at: model.start_at,
        });

        Ok(BookingConfirmationDto {
            appointment_id,
            manage_token,
        })
    }

    pub async fn get_by_token(
        &self,
        slug: &str,
        manage_token: &str,
    ) -> BookingResult<AppointmentDetailDto> {
        let establishment = self
            .establishment_repo
            .find_by_slug(slug)
            .await?
            .ok_or(BookingError::NotFound)?;

        self.appointment_repo
            .find_detail_by_token(establishment.id, manage_token)
            .await?
            .ok_or(BookingError::NotFound)
    }

    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        manage_token: &str,
        new_start_at: DateTime<Utc>,
    ) -> BookingResult<()> {
        info!(%appointment_id, new_start_at = %new_start_at, "booking: reschedule requested");
        let appointment = self.load_for_token(appointment_id, manage_token).await?;
        let establishment = self.owning_establishment(&appointment).await?;

        let status = AppointmentStatus::from_str(&appointment.status);
        if !matches!(status, AppointmentStatus::Booked | AppointmentStatus::Confirmed) {
            return Err(BookingError::NotModifiable {
                min_hours: establishment.reschedule_min_hours,
            });
        }

        let now = Utc::now();
        if !within_modification_window(appointment.start_at, establishment.reschedule_min_hours, now)
        {
            warn!(%appointment_id, "booking: reschedule window has passed");
            return Err(BookingError::NotModifiable {
                min_hours: establishment.reschedule_min_hours,
            });
        }

        let professional = self
            .load_professional(&establishment, appointment.professional_id)
            .await?;
        let service = self.load_service(&establishment, appointment.service_id).await?;

        self.ensure_slot_offerable(
            &establishment,
            &professional,
            &service,
            new_start_at,
            Some(appointment_id),
            now,
        )
        .await?;

        let new_end_at = new_start_at + TimeDelta::minutes(service.duration_minutes as i64);
        let moved = self
            .appointment_repo
            .reschedule_checked(appointment_id, new_start_at, new_end_at, professional.capacity)
            .await
            .map_err(|err| {
                error!(%appointment_id, db_error = ?err, "booking: reschedule update failed");
                BookingError::Internal(err)
            })?;
        if !moved {
            return Err(BookingError::SlotUnavailable);
        }

        info!(%appointment_id, new_start_at = %new_start_at, "booking: appointment rescheduled");

        // The original manage token stays valid; it is never reissued.
        self.dispatch_rescheduled(BookingNotification {
            appointment_id,
            establishment_id: establishment.id,
            customer_name: appointment.customer_name.clone(),
            customer_phone: appointment.customer_phone.clone(),
            start_at: new_start_at,
        });

        Ok(())
    }

    pub async fn cancel(&self, appointment_id: Uuid, manage_token: &str) -> BookingResult<()> {
        info!(%appointment_id, "booking: cancel requested");
        let appointment = self.load_for_token(appointment_id, manage_token).await?;

        let status = AppointmentStatus::from_str(&appointment.status);
        if status.is_terminal() {
            info!(%appointment_id, status = %status, "booking: cancel on terminal appointment is a no-op");
            return Ok(());
        }

        let establishment = self.owning_establishment(&appointment).await?;
        if !within_modification_window(
            appointment.start_at,
            establishment.reschedule_min_hours,
            Utc::now(),
        ) {
            warn!(%appointment_id, "booking: cancel window has passed");
            return Err(BookingError::NotModifiable {
                min_hours: establishment.reschedule_min_hours,
            });
        }

        self.appointment_repo
            .set_canceled(appointment_id)
            .await
            .map_err(|err| {
                error!(%appointment_id, db_error = ?err, "booking: cancel update failed");
                BookingError::Internal(err)
            })?;

        info!(%appointment_id, "booking: appointment canceled");

        self.dispatch_canceled(BookingNotification {
            appointment_id,
            establishment_id: establishment.id,
            customer_name: appointment.customer_name.clone(),
            customer_phone: appointment.customer_phone.clone(),
            start_at: appointment.start_at,
        });

        Ok(())
    }

    pub async fn confirm(&self, appointment_id: Uuid, manage_token: &str) -> BookingResult<()> {
        let appointment = self.load_for_token(appointment_id, manage_token).await?;

        match AppointmentStatus::from_str(&appointment.status) {
            AppointmentStatus::Booked => {
                self.appointment_repo
                    .set_confirmed(appointment_id)
                    .await
                    .map_err(BookingError::Internal)?;
                info!(%appointment_id, "booking: appointment confirmed");
                Ok(())
            }
            AppointmentStatus::Confirmed => Ok(()),
            _ => {
                let establishment = self.owning_establishment(&appointment).await?;
                Err(BookingError::NotModifiable {
                    min_hours: establishment.reschedule_min_hours,
                })
            }
        }
    }

    pub async fn complete(
        &self,
        appointment_id: Uuid,
        manage_token: &str,
        completed_by: Option<String>,
    ) -> BookingResult<()> {
        let appointment = self.load_for_token(appointment_id, manage_token).await?;

        match AppointmentStatus::from_str(&appointment.status) {
            AppointmentStatus::Booked | AppointmentStatus::Confirmed => {
                self.appointment_repo
                    .set_completed(appointment_id, completed_by)
                    .await
                    .map_err(BookingError::Internal)?;
                info!(%appointment_id, "booking: appointment completed");
                Ok(())
            }
            AppointmentStatus::Completed => Ok(()),
            _ => {
                let establishment = self.owning_establishment(&appointment).await?;
                Err(BookingError::NotModifiable {
                    min_hours: establishment.reschedule_min_hours,
                })
            }
        }
    }

    /// Gate used by the admin collaborator before creating a professional.
    pub async fn can_add_professional(&self, slug: &str) -> BookingResult<bool> {
        let establishment = self
            .establishment_repo
            .find_by_slug(slug)
            .await?
            .ok_or(BookingError::NotFound)?;

        let current = self
            .catalog_repo
            .count_active_professionals(establishment.id)
            .await?;
        let plan = self
            .plan_resolver
            .resolve_effective_plan_for_owner(establishment.owner_user_id)
            .await?;

        Ok(entitlement::can_add_professional(current, &plan))
    }

    async fn resolve_bookable_establishment(
        &self,
        slug: &str,
    ) -> BookingResult<EstablishmentEntity> {
        let establishment = self
            .establishment_repo
            .find_by_slug(slug)
            .await
            .map_err(|err| {
                error!(slug, db_error = ?err, "booking: failed to load establishment");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::NotFound)?;

        // A disabled booking page behaves like an unpublished one.
        if !establishment.booking_enabled {
            warn!(slug, "booking: establishment has online booking disabled");
            return Err(BookingError::NotFound);
        }
        Ok(establishment)
    }

    async fn booking_entitlement(
        &self,
        establishment: &EstablishmentEntity,
    ) -> BookingResult<Option<EntitlementReason>> {
        let now = Utc::now();
        let plan = self
            .plan_resolver
            .resolve_effective_plan_for_owner(establishment.owner_user_id)
            .await?;

        let (month_start, month_end) = entitlement::calendar_month_bounds(now);
        let appointments_this_month = self
            .appointment_repo
            .count_non_canceled_between(establishment.id, month_start, month_end)
            .await?;

        Ok(entitlement::evaluate_booking_entitlement(
            establishment,
            &plan,
            appointments_this_month,
            now,
        ))
    }

    async fn load_professional(
        &self,
        establishment: &EstablishmentEntity,
        professional_id: Uuid,
    ) -> BookingResult<ProfessionalEntity> {
        self.catalog_repo
            .find_active_professional(establishment.id, professional_id)
            .await?
            .ok_or_else(|| BookingError::Validation("unknown or inactive professional".to_string()))
    }

    async fn load_service(
        &self,
        establishment: &EstablishmentEntity,
        service_id: Uuid,
    ) -> BookingResult<ServiceEntity> {
        self.catalog_repo
            .find_active_service(establishment.id, service_id)
            .await?
            .ok_or_else(|| BookingError::Validation("unknown or inactive service".to_string()))
    }

    async fn load_for_token(
        &self,
        appointment_id: Uuid,
        manage_token: &str,
    ) -> BookingResult<AppointmentEntity> {
        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if appointment.manage_token != manage_token {
            warn!(%appointment_id, "booking: manage token mismatch");
            return Err(BookingError::InvalidToken);
        }
        Ok(appointment)
    }

    async fn owning_establishment(
        &self,
        appointment: &AppointmentEntity,
    ) -> BookingResult<EstablishmentEntity> {
        self.establishment_repo
            .find_by_id(appointment.establishment_id)
            .await?
            .ok_or_else(|| {
                BookingError::Internal(anyhow!(
                    "appointment {} references a missing establishment",
                    appointment.id
                ))
            })
    }

    /// Fresh open-starts for one day; shared by the listing and by the
    /// commit-time re-validation of a single candidate. A reschedule passes
    /// its own appointment id so the window being vacated does not count
    /// against occupancy, mirroring the store's transactional re-check.
    async fn open_starts(
        &self,
        establishment: &EstablishmentEntity,
        professional: &ProfessionalEntity,
        service: &ServiceEntity,
        date: NaiveDate,
        exclude_appointment: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> BookingResult<Vec<i32>> {
        let weekday = date.weekday().num_days_from_sunday() as i16;
        let day_start = slots::at_minutes(date, 0);
        let day_end = day_start + TimeDelta::days(1);

        let hours = self
            .availability_repo
            .business_hours_for_weekday(establishment.id, weekday)
            .await?;
        let recurring = self
            .availability_repo
            .recurring_blocks_for_weekday(establishment.id, professional.id, weekday)
            .await?;
        let punctual = self
            .availability_repo
            .punctual_blocks_between(establishment.id, professional.id, day_start, day_end)
            .await?;

        let open = calendar::open_intervals(
            hours.as_ref(),
            &recurring,
            &punctual,
            professional.id,
            date,
        );

        let occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = self
            .appointment_repo
            .list_occupying_between(establishment.id, professional.id, day_start, day_end)
            .await?
            .into_iter()
            .filter(|appointment| Some(appointment.id) != exclude_appointment)
            .map(|appointment| (appointment.start_at, appointment.end_at))
            .collect();

        let params = slots::SlotParams {
            duration_minutes: service.duration_minutes,
            interval_minutes: establishment.slot_interval_minutes,
            buffer_minutes: establishment.buffer_minutes,
            capacity: professional.capacity,
            max_future_days: establishment.max_future_days,
        };

        Ok(slots::available_starts(&open, date, &params, &occupied, now))
    }

    async fn ensure_slot_offerable(
        &self,
        establishment: &EstablishmentEntity,
        professional: &ProfessionalEntity,
        service: &ServiceEntity,
        start_at: DateTime<Utc>,
        exclude_appointment: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> BookingResult<()> {
        let date = start_at.date_naive();
        let minutes = (start_at - slots::at_minutes(date, 0)).num_minutes() as i32;

        // The generator only ever offers whole-minute grid starts; a
        // timestamp with stray seconds would round down to the previous
        // candidate and commit an off-grid booking.
        if slots::at_minutes(date, minutes) != start_at {
            warn!(
                start_at = %start_at,
                "booking: requested start is not on the slot grid"
            );
            return Err(BookingError::SlotUnavailable);
        }

        let starts = self
            .open_starts(
                establishment,
                professional,
                service,
                date,
                exclude_appointment,
                now,
            )
            .await?;
        if !starts.contains(&minutes) {
            return Err(BookingError::SlotUnavailable);
        }
        Ok(())
    }

    fn dispatch_created(&self, notification: BookingNotification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.booking_created(&notification).await {
                warn!(
                    appointment_id = %notification.appointment_id,
                    error = ?err,
                    "booking: confirmation dispatch failed"
                );
            }
        });
    }

    fn dispatch_rescheduled(&self, notification: BookingNotification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.booking_rescheduled(&notification).await {
                warn!(
                    appointment_id = %notification.appointment_id,
                    error = ?err,
                    "booking: reschedule dispatch failed"
                );
            }
        });
    }

    fn dispatch_canceled(&self, notification: BookingNotification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.booking_canceled(&notification).await {
                warn!(
                    appointment_id = %notification.appointment_id,
                    error = ?err,
                    "booking: cancellation dispatch failed"
                );
            }
        });
    }
}
