pub mod booking;
pub mod calendar;
pub mod entitlement;
pub mod slots;
