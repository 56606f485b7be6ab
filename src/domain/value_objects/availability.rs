use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Half-open interval in minutes-of-day, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteInterval {
    pub start: i32,
    pub end: i32,
}

impl MinuteInterval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotQueryModel {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct AvailableSlotsDto {
    pub date: NaiveDate,
    pub slots: Vec<String>,
}
