use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum EstablishmentStatus {
    #[default]
    Trial,
    Active,
    PastDue,
    Canceled,
}

impl Display for EstablishmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            EstablishmentStatus::Trial => "trial",
            EstablishmentStatus::Active => "active",
            EstablishmentStatus::PastDue => "past_due",
            EstablishmentStatus::Canceled => "canceled",
        };
        write!(f, "{}", status)
    }
}

impl EstablishmentStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "trial" => EstablishmentStatus::Trial,
            "active" => EstablishmentStatus::Active,
            "past_due" => EstablishmentStatus::PastDue,
            "canceled" => EstablishmentStatus::Canceled,
            other => {
                // Refusing new bookings is the safe reading of corrupt data.
                warn!(status = other, "establishment_statuses: unrecognized value");
                EstablishmentStatus::Canceled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_values_read_as_canceled() {
        assert_eq!(
            EstablishmentStatus::from_str("suspended"),
            EstablishmentStatus::Canceled
        );
    }
}
