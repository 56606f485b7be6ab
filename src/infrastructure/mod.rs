pub mod axum_http;
pub mod notifications;
pub mod postgres;
