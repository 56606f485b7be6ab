use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public booking form payload for creating an appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentModel {
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmationDto {
    pub appointment_id: Uuid,
    pub manage_token: String,
}

/// Appointment detail with denormalized names, returned to the
/// self-service management page.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentDetailDto {
    pub id: Uuid,
    pub status: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub establishment_name: String,
    pub establishment_slug: String,
    pub service_name: String,
    pub service_duration_minutes: i32,
    pub professional_name: String,
    pub reschedule_min_hours: i32,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleModel {
    pub manage_token: String,
    pub new_start_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ManageTokenModel {
    pub manage_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteModel {
    pub manage_token: String,
    pub completed_by: Option<String>,
}

/// Minimal payload handed to the notification gateway after a commit.
#[derive(Debug, Clone)]
pub struct BookingNotification {
    pub appointment_id: Uuid,
    pub establishment_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_at: DateTime<Utc>,
}
