use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    entities::{establishments::EstablishmentEntity, plans::PlanEntity},
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        entitlement::EntitlementReason, enums::establishment_statuses::EstablishmentStatus,
    },
};

/// First-match-wins entitlement decision for accepting a new booking.
/// Returns `None` when the establishment may accept.
pub fn evaluate_booking_entitlement(
    establishment: &EstablishmentEntity,
    plan: &PlanEntity,
    appointments_this_month: i64,
    now: DateTime<Utc>,
) -> Option<EntitlementReason> {
    match EstablishmentStatus::from_str(&establishment.status) {
        EstablishmentStatus::PastDue | EstablishmentStatus::Canceled => {
            return Some(EntitlementReason::SubscriptionInactive);
        }
        EstablishmentStatus::Trial => {
            let expired = match establishment.trial_ends_at {
                Some(trial_ends_at) => now > trial_ends_at,
                None => true,
            };
            if expired {
                return Some(EntitlementReason::TrialExpired);
            }
        }
        EstablishmentStatus::Active => {}
    }

    if let Some(max) = plan.max_appointments_month {
        if appointments_this_month >= max as i64 {
            return Some(EntitlementReason::AppointmentLimitReached);
        }
    }

    None
}

/// Gate for admin creation of a new professional under the effective plan.
pub fn can_add_professional(current_count: i64, plan: &PlanEntity) -> bool {
    plan.max_professionals
        .map_or(true, |max| current_count < max as i64)
}

/// `[start, end)` of the calendar month containing `now`, for the monthly
/// quota count.
pub fn calendar_month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let month_start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("first of month is valid");
    let next_month_start = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("first of month is valid");

    (
        month_start.and_time(NaiveTime::MIN).and_utc(),
        next_month_start.and_time(NaiveTime::MIN).and_utc(),
    )
}

/// Resolves the effective plan for an establishment owner: most recent
/// active subscription's plan, else the configured free plan.
pub struct PlanResolver<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    free_plan_id: Uuid,
}

impl<P, S> PlanResolver<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>, free_plan_id: Uuid) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            free_plan_id,
        }
    }

    pub async fn resolve_effective_plan_for_owner(
        &self,
        owner_user_id: Uuid,
    ) -> Result<PlanEntity> {
        if let Some(subscription) = self
            .subscription_repo
            .find_latest_active_for_user(owner_user_id)
            .await?
        {
            if let Some(plan) = self
                .plan_repo
                .find_active_plan_by_id(subscription.plan_id)
                .await?
            {
                debug!(
                    %owner_user_id,
                    plan_id = %plan.id,
                    "plan_resolver: using active subscription plan"
                );
                return Ok(plan);
            }
        }

        debug!(%owner_user_id, "plan_resolver: falling back to free plan");
        match self
            .plan_repo
            .find_active_plan_by_id(self.free_plan_id)
            .await?
        {
            Some(plan) => Ok(plan),
            None => Ok(PlanEntity::free_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use crate::domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{plans::MockPlanRepository, subscriptions::MockSubscriptionRepository},
        value_objects::plans::FREE_PLAN_ID,
    };
    use mockall::predicate::eq;

    fn establishment(status: &str, trial_ends_at: Option<DateTime<Utc>>) -> EstablishmentEntity {
        EstablishmentEntity {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::new_v4(),
            slug: "corner-cuts".to_string(),
            name: "Corner Cuts".to_string(),
            status: status.to_string(),
            trial_ends_at,
            booking_enabled: true,
            reschedule_min_hours: 2,
            max_future_days: 60,
            slot_interval_minutes: 15,
            buffer_minutes: 0,
            created_at: Utc::now(),
        }
    }

    fn plan(max_appointments_month: Option<i32>) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            code: "pro".to_string(),
            name: "Pro".to_string(),
            max_professionals: Some(5),
            max_appointments_month,
            is_active: true,
        }
    }

    #[test]
    fn past_due_and_canceled_are_inactive() {
        let now = Utc::now();
        for status in ["past_due", "canceled"] {
            let decision =
                evaluate_booking_entitlement(&establishment(status, None), &plan(None), 0, now);
            assert_eq!(decision, Some(EntitlementReason::SubscriptionInactive));
        }
    }

    #[test]
    fn trial_accepts_one_second_before_expiry() {
        let trial_ends_at: DateTime<Utc> = "2025-06-10T12:00:00Z".parse().unwrap();
        let now = trial_ends_at - TimeDelta::seconds(1);
        let decision = evaluate_booking_entitlement(
            &establishment("trial", Some(trial_ends_at)),
            &plan(None),
            0,
            now,
        );
        assert_eq!(decision, None);
    }

    #[test]
    fn trial_rejects_one_second_after_expiry() {
        let trial_ends_at: DateTime<Utc> = "2025-06-10T12:00:00Z".parse().unwrap();
        let now = trial_ends_at + TimeDelta::seconds(1);
        let decision = evaluate_booking_entitlement(
            &establishment("trial", Some(trial_ends_at)),
            &plan(None),
            0,
            now,
        );
        assert_eq!(decision, Some(EntitlementReason::TrialExpired));
    }

    #[test]
    fn trial_without_end_date_counts_as_expired() {
        let decision = evaluate_booking_entitlement(
            &establishment("trial", None),
            &plan(None),
            0,
            Utc::now(),
        );
        assert_eq!(decision, Some(EntitlementReason::TrialExpired));
    }

    #[test]
    fn quota_rejects_exactly_at_the_limit() {
        let now = Utc::now();
        let active = establishment("active", None);
        let limited = plan(Some(30));

        assert_eq!(evaluate_booking_entitlement(&active, &limited, 29, now), None);
        assert_eq!(
            evaluate_booking_entitlement(&active, &limited, 30, now),
            Some(EntitlementReason::AppointmentLimitReached)
        );
    }

    #[test]
    fn unlimited_plan_never_hits_the_quota() {
        let decision = evaluate_booking_entitlement(
            &establishment("active", None),
            &plan(None),
            100_000,
            Utc::now(),
        );
        assert_eq!(decision, None);
    }

    #[test]
    fn professional_limit_gates_at_the_boundary() {
        let limited = plan(None);
        assert!(can_add_professional(4, &limited));
        assert!(!can_add_professional(5, &limited));

        let unlimited = PlanEntity {
            max_professionals: None,
            ..plan(None)
        };
        assert!(can_add_professional(500, &unlimited));
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let now: DateTime<Utc> = "2025-12-15T09:30:00Z".parse().unwrap();
        let (start, end) = calendar_month_bounds(now);
        assert_eq!(start, "2025-12-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    fn sample_subscription(user_id: Uuid, plan_id: Uuid) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            status: "active".to_string(),
            starts_at: now - TimeDelta::days(1),
            ends_at: now + TimeDelta::days(29),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn resolver_prefers_the_subscribed_plan() {
        let owner_id = Uuid::new_v4();
        let paid_plan = plan(Some(500));
        let paid_plan_id = paid_plan.id;

        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        let subscription = sample_subscription(owner_id, paid_plan_id);
        subscription_repo
            .expect_find_latest_active_for_user()
            .with(eq(owner_id))
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        plan_repo
            .expect_find_active_plan_by_id()
            .with(eq(paid_plan_id))
            .returning(move |_| {
                let plan = paid_plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let resolver = PlanResolver::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            FREE_PLAN_ID,
        );
        let resolved = resolver
            .resolve_effective_plan_for_owner(owner_id)
            .await
            .unwrap();
        assert_eq!(resolved.id, paid_plan_id);
    }

    #[tokio::test]
    async fn resolver_falls_back_to_the_free_plan() {
        let owner_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        subscription_repo
            .expect_find_latest_active_for_user()
            .with(eq(owner_id))
            .returning(|_| Box::pin(async { Ok(None) }));
        plan_repo
            .expect_find_active_plan_by_id()
            .with(eq(FREE_PLAN_ID))
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolver = PlanResolver::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            FREE_PLAN_ID,
        );
        let resolved = resolver
            .resolve_effective_plan_for_owner(owner_id)
            .await
            .unwrap();
        assert_eq!(resolved.id, FREE_PLAN_ID);
        assert_eq!(resolved.code, "free");
    }
}
