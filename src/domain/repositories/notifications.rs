use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::appointments::BookingNotification;

/// Outbound customer messaging. Dispatch happens after the transactional
/// commit and its failure never propagates to the booking flow.
#[async_trait]
#[automock]
pub trait NotificationGateway {
    async fn booking_created(&self, notification: &BookingNotification) -> Result<()>;
    async fn booking_rescheduled(&self, notification: &BookingNotification) -> Result<()>;
    async fn booking_canceled(&self, notification: &BookingNotification) -> Result<()>;
}
