use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

/// Fixed UUID representing the free plan.
pub const FREE_PLAN_ID: Uuid = Uuid::nil();

impl PlanEntity {
    /// Built-in free tier used when the free plan row is missing.
    pub fn free_default() -> Self {
        Self {
            id: FREE_PLAN_ID,
            code: "free".to_string(),
            name: "Free".to_string(),
            max_professionals: Some(1),
            max_appointments_month: Some(30),
            is_active: true,
        }
    }
}
