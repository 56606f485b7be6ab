use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::{booking::BookingUseCase, entitlement::PlanResolver},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            appointments::AppointmentRepository, availability::AvailabilityRepository,
            catalog::CatalogRepository, establishments::EstablishmentRepository,
            notifications::NotificationGateway, plans::PlanRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            appointments::{CompleteModel, CreateAppointmentModel, ManageTokenModel, RescheduleModel},
            availability::SlotQueryModel,
        },
    },
    infrastructure::{
        notifications::log_notifier::LogNotifier,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                appointments::AppointmentPostgres, availability::AvailabilityPostgres,
                catalog::CatalogPostgres, establishments::EstablishmentPostgres,
                plans::PlanPostgres, subscriptions::SubscriptionPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let establishment_repo = EstablishmentPostgres::new(Arc::clone(&db_pool));
    let catalog_repo = CatalogPostgres::new(Arc::clone(&db_pool));
    let availability_repo = AvailabilityPostgres::new(Arc::clone(&db_pool));
    let appointment_repo = AppointmentPostgres::new(Arc::clone(&db_pool));
    let plan_repo = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repo = SubscriptionPostgres::new(Arc::clone(&db_pool));

    let plan_resolver = PlanResolver::new(
        Arc::new(plan_repo),
        Arc::new(subscription_repo),
        config.free_plan_id,
    );

    let usecase = BookingUseCase::new(
        Arc::new(establishment_repo),
        Arc::new(catalog_repo),
        Arc::new(availability_repo),
        Arc::new(appointment_repo),
        Arc::new(plan_resolver),
        Arc::new(LogNotifier::new()),
    );

    Router::new()
        .route("/:slug/slots", get(list_slots))
        .route("/:slug/can-accept", get(can_accept))
        .route("/:slug/can-add-professional", get(can_add_professional))
        .route("/:slug/appointments", post(create_appointment))
        .route("/:slug/appointments/:token", get(get_appointment))
        .route("/appointments/:id/reschedule", post(reschedule_appointment))
        .route("/appointments/:id/cancel", post(cancel_appointment))
        .route("/appointments/:id/confirm", post(confirm_appointment))
        .route("/appointments/:id/complete", post(complete_appointment))
        .with_state(Arc::new(usecase))
}

pub async fn list_slots<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(slug): Path<String>,
    Query(query): Query<SlotQueryModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.list_available_slots(&slug, query).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn can_accept<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(slug): Path<String>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.can_accept_bookings(&slug).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn can_add_professional<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(slug): Path<String>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.can_add_professional(&slug).await {
        Ok(allowed) => Json(serde_json::json!({ "can_add": allowed })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(slug): Path<String>,
    Json(model): Json<CreateAppointmentModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    info!(slug, "booking router: create appointment request received");
    match usecase.create_appointment(&slug, model).await {
        Ok(confirmation) => (StatusCode::CREATED, Json(confirmation)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path((slug, token)): Path<(String, String)>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.get_by_token(&slug, &token).await {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn reschedule_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(appointment_id): Path<Uuid>,
    Json(model): Json<RescheduleModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase
        .reschedule(appointment_id, &model.manage_token, model.new_start_at)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn cancel_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(appointment_id): Path<Uuid>,
    Json(model): Json<ManageTokenModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.cancel(appointment_id, &model.manage_token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn confirm_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(appointment_id): Path<Uuid>,
    Json(model): Json<ManageTokenModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase.confirm(appointment_id, &model.manage_token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn complete_appointment<E, C, Av, Ap, P, S, N>(
    State(usecase): State<Arc<BookingUseCase<E, C, Av, Ap, P, S, N>>>,
    Path(appointment_id): Path<Uuid>,
    Json(model): Json<CompleteModel>,
) -> impl IntoResponse
where
    E: EstablishmentRepository + Send + Sync + 'static,
    C: CatalogRepository + Send + Sync + 'static,
    Av: AvailabilityRepository + Send + Sync + 'static,
    Ap: AppointmentRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match usecase
        .complete(appointment_id, &model.manage_token, model.completed_by)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
