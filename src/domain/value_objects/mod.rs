pub mod appointments;
pub mod availability;
pub mod entitlement;
pub mod enums;
pub mod plans;
