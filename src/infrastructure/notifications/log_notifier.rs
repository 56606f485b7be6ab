use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    repositories::notifications::NotificationGateway,
    value_objects::appointments::BookingNotification,
};

/// Structured-log dispatcher. The messaging collaborator (email/SMS) swaps
/// in behind the same gateway trait; the booking flow never waits on it.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationGateway for LogNotifier {
    async fn booking_created(&self, notification: &BookingNotification) -> Result<()> {
        info!(
            appointment_id = %notification.appointment_id,
            establishment_id = %notification.establishment_id,
            customer_phone = %notification.customer_phone,
            start_at = %notification.start_at,
            "notifier: booking confirmation queued"
        );
        Ok(())
    }

    async fn booking_rescheduled(&self, notification: &BookingNotification) -> Result<()> {
        info!(
            appointment_id = %notification.appointment_id,
            establishment_id = %notification.establishment_id,
            start_at = %notification.start_at,
            "notifier: reschedule notice queued"
        );
        Ok(())
    }

    async fn booking_canceled(&self, notification: &BookingNotification) -> Result<()> {
        info!(
            appointment_id = %notification.appointment_id,
            establishment_id = %notification.establishment_id,
            "notifier: cancellation notice queued"
        );
        Ok(())
    }
}
