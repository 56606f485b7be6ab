pub mod appointments;
pub mod business_hours;
pub mod establishments;
pub mod plans;
pub mod professionals;
pub mod services;
pub mod subscriptions;
pub mod time_blocks;
