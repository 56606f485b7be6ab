use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Why a tenant may not accept a new booking right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntitlementReason {
    NoEstablishment,
    SubscriptionInactive,
    TrialExpired,
    AppointmentLimitReached,
}

impl Display for EntitlementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            EntitlementReason::NoEstablishment => "NO_ESTABLISHMENT",
            EntitlementReason::SubscriptionInactive => "SUBSCRIPTION_INACTIVE",
            EntitlementReason::TrialExpired => "TRIAL_EXPIRED",
            EntitlementReason::AppointmentLimitReached => "APPOINTMENT_LIMIT_REACHED",
        };
        write!(f, "{}", code)
    }
}

impl EntitlementReason {
    pub fn message(&self) -> &'static str {
        match self {
            EntitlementReason::NoEstablishment => "establishment not found",
            EntitlementReason::SubscriptionInactive => "subscription is not active",
            EntitlementReason::TrialExpired => "trial period has ended",
            EntitlementReason::AppointmentLimitReached => {
                "monthly appointment limit reached for the current plan"
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CanAcceptDto {
    pub can_accept: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CanAcceptDto {
    pub fn accept() -> Self {
        Self {
            can_accept: true,
            reason: None,
            error_code: None,
        }
    }

    pub fn reject(reason: EntitlementReason) -> Self {
        Self {
            can_accept: false,
            reason: Some(reason.message().to_string()),
            error_code: Some(reason.to_string()),
        }
    }
}
