pub mod appointments;
pub mod availability;
pub mod catalog;
pub mod establishments;
pub mod notifications;
pub mod plans;
pub mod subscriptions;
