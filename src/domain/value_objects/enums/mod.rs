pub mod appointment_statuses;
pub mod establishment_statuses;
pub mod subscription_statuses;
