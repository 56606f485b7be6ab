use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike};
use uuid::Uuid;

use crate::domain::entities::business_hours::BusinessHoursEntity;
use crate::domain::entities::time_blocks::{PunctualTimeBlockEntity, RecurringTimeBlockEntity};
use crate::domain::value_objects::availability::MinuteInterval;

pub fn minutes_of_day(time: NaiveTime) -> i32 {
    (time.num_seconds_from_midnight() / 60) as i32
}

/// Collapses one day's business hours and closure blocks into the ordered
/// open intervals for a professional, in minutes-of-day.
///
/// A missing or closed hours row yields no intervals. Blocks apply when
/// they target the whole establishment (null professional) or the queried
/// professional; recurring blocks must be active and match the weekday,
/// punctual blocks are clipped to the queried date.
pub fn open_intervals(
    hours: Option<&BusinessHoursEntity>,
    recurring_blocks: &[RecurringTimeBlockEntity],
    punctual_blocks: &[PunctualTimeBlockEntity],
    professional_id: Uuid,
    date: NaiveDate,
) -> Vec<MinuteInterval> {
    let hours = match hours {
        Some(row) if !row.closed => row,
        _ => return Vec::new(),
    };

    let (open_time, close_time) = match (hours.open_time, hours.close_time) {
        (Some(open), Some(close)) => (open, close),
        _ => return Vec::new(),
    };

    let base = MinuteInterval::new(minutes_of_day(open_time), minutes_of_day(close_time));
    if base.is_empty() {
        return Vec::new();
    }

    let weekday = date.weekday().num_days_from_sunday() as i16;
    let applies_to = |block_professional: Option<Uuid>| {
        block_professional.map_or(true, |id| id == professional_id)
    };

    let mut blocks: Vec<MinuteInterval> = Vec::new();

    for block in recurring_blocks {
        if block.active && block.weekday == weekday && applies_to(block.professional_id) {
            blocks.push(MinuteInterval::new(
                minutes_of_day(block.start_time),
                minutes_of_day(block.end_time),
            ));
        }
    }

    let day_start = date.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + TimeDelta::days(1);
    for block in punctual_blocks {
        if !applies_to(block.professional_id) {
            continue;
        }
        let clipped_start = block.start_at.max(day_start);
        let clipped_end = block.end_at.min(day_end);
        if clipped_start < clipped_end {
            blocks.push(MinuteInterval::new(
                (clipped_start - day_start).num_minutes() as i32,
                (clipped_end - day_start).num_minutes() as i32,
            ));
        }
    }

    subtract_blocks(base, merge_intervals(blocks))
}

/// Sorts and coalesces overlapping intervals so subtraction never
/// double-counts.
fn merge_intervals(mut intervals: Vec<MinuteInterval>) -> Vec<MinuteInterval> {
    intervals.retain(|interval| !interval.is_empty());
    intervals.sort_by_key(|interval| interval.start);

    let mut merged: Vec<MinuteInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Standard interval difference of `base` minus `blocks` (blocks must be
/// merged and ordered).
fn subtract_blocks(base: MinuteInterval, blocks: Vec<MinuteInterval>) -> Vec<MinuteInterval> {
    let mut result = Vec::new();
    let mut cursor = base.start;

    for block in blocks {
        if block.end <= cursor || block.start >= base.end {
            continue;
        }
        if block.start > cursor {
            result.push(MinuteInterval::new(cursor, block.start.min(base.end)));
        }
        cursor = cursor.max(block.end);
        if cursor >= base.end {
            break;
        }
    }

    if cursor < base.end {
        result.push(MinuteInterval::new(cursor, base.end));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn hours_row(open: &str, close: &str, closed: bool) -> BusinessHoursEntity {
        BusinessHoursEntity {
            id: Uuid::new_v4(),
            establishment_id: Uuid::new_v4(),
            weekday: 1,
            open_time: Some(open.parse().unwrap()),
            close_time: Some(close.parse().unwrap()),
            closed,
        }
    }

    fn recurring(
        professional_id: Option<Uuid>,
        weekday: i16,
        start: &str,
        end: &str,
        active: bool,
    ) -> RecurringTimeBlockEntity {
        RecurringTimeBlockEntity {
            id: Uuid::new_v4(),
            establishment_id: Uuid::new_v4(),
            professional_id,
            weekday,
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            active,
            reason: None,
        }
    }

    fn punctual(
        professional_id: Option<Uuid>,
        start_at: &str,
        end_at: &str,
    ) -> PunctualTimeBlockEntity {
        PunctualTimeBlockEntity {
            id: Uuid::new_v4(),
            establishment_id: Uuid::new_v4(),
            professional_id,
            start_at: start_at.parse::<DateTime<Utc>>().unwrap(),
            end_at: end_at.parse::<DateTime<Utc>>().unwrap(),
            reason: None,
        }
    }

    // 2025-06-02 is a Monday (weekday 1).
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn missing_hours_row_means_closed() {
        let intervals = open_intervals(None, &[], &[], Uuid::new_v4(), monday());
        assert!(intervals.is_empty());
    }

    #[test]
    fn closed_flag_wins_over_times() {
        let hours = hours_row("09:00", "18:00", true);
        let intervals = open_intervals(Some(&hours), &[], &[], Uuid::new_v4(), monday());
        assert!(intervals.is_empty());
    }

    #[test]
    fn plain_day_is_one_interval() {
        let hours = hours_row("09:00", "18:00", false);
        let intervals = open_intervals(Some(&hours), &[], &[], Uuid::new_v4(), monday());
        assert_eq!(intervals, vec![MinuteInterval::new(540, 1080)]);
    }

    #[test]
    fn block_inside_hours_splits_the_interval() {
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![recurring(None, 1, "12:00", "13:00", true)];
        let intervals = open_intervals(Some(&hours), &blocks, &[], Uuid::new_v4(), monday());
        assert_eq!(
            intervals,
            vec![MinuteInterval::new(540, 720), MinuteInterval::new(780, 1080)]
        );
    }

    #[test]
    fn block_covering_the_whole_day_empties_it() {
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![recurring(None, 1, "08:00", "19:00", true)];
        let intervals = open_intervals(Some(&hours), &blocks, &[], Uuid::new_v4(), monday());
        assert!(intervals.is_empty());
    }

    #[test]
    fn overlapping_blocks_are_merged_before_subtraction() {
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![
            recurring(None, 1, "11:00", "13:00", true),
            recurring(None, 1, "12:00", "14:00", true),
        ];
        let intervals = open_intervals(Some(&hours), &blocks, &[], Uuid::new_v4(), monday());
        assert_eq!(
            intervals,
            vec![MinuteInterval::new(540, 660), MinuteInterval::new(840, 1080)]
        );
    }

    #[test]
    fn inactive_and_other_weekday_blocks_are_ignored() {
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![
            recurring(None, 1, "10:00", "11:00", false),
            recurring(None, 2, "12:00", "13:00", true),
        ];
        let intervals = open_intervals(Some(&hours), &blocks, &[], Uuid::new_v4(), monday());
        assert_eq!(intervals, vec![MinuteInterval::new(540, 1080)]);
    }

    #[test]
    fn blocks_for_another_professional_are_ignored() {
        let queried = Uuid::new_v4();
        let other = Uuid::new_v4();
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![
            recurring(Some(other), 1, "09:00", "12:00", true),
            recurring(Some(queried), 1, "16:00", "17:00", true),
        ];
        let intervals = open_intervals(Some(&hours), &blocks, &[], queried, monday());
        assert_eq!(
            intervals,
            vec![MinuteInterval::new(540, 960), MinuteInterval::new(1020, 1080)]
        );
    }

    #[test]
    fn punctual_block_is_clipped_to_the_queried_date() {
        let hours = hours_row("09:00", "18:00", false);
        // Runs from Sunday evening into Monday 10:30.
        let blocks = vec![punctual(None, "2025-06-01T20:00:00Z", "2025-06-02T10:30:00Z")];
        let intervals = open_intervals(Some(&hours), &[], &blocks, Uuid::new_v4(), monday());
        assert_eq!(intervals, vec![MinuteInterval::new(630, 1080)]);
    }

    #[test]
    fn punctual_block_outside_hours_is_ignored() {
        let hours = hours_row("09:00", "18:00", false);
        let blocks = vec![punctual(None, "2025-06-02T19:00:00Z", "2025-06-02T20:00:00Z")];
        let intervals = open_intervals(Some(&hours), &[], &blocks, Uuid::new_v4(), monday());
        assert_eq!(intervals, vec![MinuteInterval::new(540, 1080)]);
    }
}
