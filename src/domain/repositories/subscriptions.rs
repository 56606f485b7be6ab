use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::SubscriptionEntity;

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Most recent active subscription of the establishment owner, if any.
    async fn find_latest_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;
}
