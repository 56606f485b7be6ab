use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum AppointmentStatus {
    #[default]
    Booked,
    Confirmed,
    Completed,
    Canceled,
    NoShow,
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::NoShow => "no_show",
        };
        write!(f, "{}", status)
    }
}

impl AppointmentStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "booked" => AppointmentStatus::Booked,
            "confirmed" => AppointmentStatus::Confirmed,
            "completed" => AppointmentStatus::Completed,
            "canceled" => AppointmentStatus::Canceled,
            "no_show" => AppointmentStatus::NoShow,
            other => {
                // Terminal is the safe reading: the row stops occupying a
                // slot and refuses further customer mutations.
                warn!(status = other, "appointment_statuses: unrecognized value");
                AppointmentStatus::Canceled
            }
        }
    }

    /// Statuses that occupy a slot when counting concurrent bookings.
    pub fn occupying() -> Vec<String> {
        vec![
            AppointmentStatus::Booked.to_string(),
            AppointmentStatus::Confirmed.to_string(),
        ]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Canceled | AppointmentStatus::NoShow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_values_read_as_terminal() {
        let status = AppointmentStatus::from_str("archived");
        assert_eq!(status, AppointmentStatus::Canceled);
        assert!(status.is_terminal());
        assert!(!AppointmentStatus::occupying().contains(&status.to_string()));
    }
}
