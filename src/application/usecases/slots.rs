use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::domain::value_objects::availability::MinuteInterval;

/// Per-request knobs for the candidate walk, resolved from the
/// establishment, service and professional rows.
#[derive(Debug, Clone, Copy)]
pub struct SlotParams {
    pub duration_minutes: i32,
    pub interval_minutes: i32,
    pub buffer_minutes: i32,
    pub capacity: i32,
    pub max_future_days: i32,
}

/// Walks the open intervals of `date` at `interval_minutes` granularity and
/// keeps every start whose booking window fits before the interval closes
/// and whose concurrent occupancy stays below capacity.
///
/// `occupied` carries the `[start, end)` ranges of booked/confirmed
/// appointments of the professional. Pure; the caller re-runs it at commit
/// time, listings are best-effort.
pub fn available_starts(
    open: &[MinuteInterval],
    date: NaiveDate,
    params: &SlotParams,
    occupied: &[(DateTime<Utc>, DateTime<Utc>)],
    now: DateTime<Utc>,
) -> Vec<i32> {
    if params.interval_minutes <= 0 || params.duration_minutes <= 0 || params.capacity < 1 {
        return Vec::new();
    }

    let today = now.date_naive();
    if date < today {
        return Vec::new();
    }
    if date > today + TimeDelta::days(params.max_future_days as i64) {
        return Vec::new();
    }

    let mut starts = Vec::new();
    for interval in open {
        let mut t = interval.start;
        while t + params.duration_minutes + params.buffer_minutes <= interval.end {
            let candidate_start = at_minutes(date, t);
            let candidate_end =
                candidate_start + TimeDelta::minutes(params.duration_minutes as i64);

            let past_cutoff = date == today && candidate_start <= now;
            if !past_cutoff {
                let occupancy = occupied
                    .iter()
                    .filter(|(start, end)| *start < candidate_end && *end > candidate_start)
                    .count();
                if (occupancy as i32) < params.capacity {
                    starts.push(t);
                }
            }

            t += params.interval_minutes;
        }
    }
    starts
}

pub fn at_minutes(date: NaiveDate, minutes: i32) -> DateTime<Utc> {
    let time = NaiveTime::from_num_seconds_from_midnight_opt(minutes as u32 * 60, 0)
        .unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

pub fn format_hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SlotParams {
        SlotParams {
            duration_minutes: 30,
            interval_minutes: 15,
            buffer_minutes: 0,
            capacity: 1,
            max_future_days: 60,
        }
    }

    // 2025-06-02 is a Monday; "now" is well before it.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn earlier_now() -> DateTime<Utc> {
        "2025-06-01T08:00:00Z".parse().unwrap()
    }

    fn business_day() -> Vec<MinuteInterval> {
        vec![MinuteInterval::new(540, 1080)] // 09:00-18:00
    }

    #[test]
    fn full_monday_yields_thirty_five_quarter_hour_starts() {
        let starts = available_starts(&business_day(), monday(), &params(), &[], earlier_now());

        assert_eq!(starts.len(), 35);
        assert_eq!(format_hhmm(starts[0]), "09:00");
        assert_eq!(format_hhmm(*starts.last().unwrap()), "17:30");
        for pair in starts.windows(2) {
            assert_eq!(pair[1] - pair[0], 15);
        }
    }

    #[test]
    fn noon_block_excludes_overlapping_starts_only() {
        // The caller resolves the 12:00-13:00 block into split open
        // intervals; candidate math must keep the exact boundary starts.
        let open = vec![MinuteInterval::new(540, 720), MinuteInterval::new(780, 1080)];
        let starts = available_starts(&open, monday(), &params(), &[], earlier_now());
        let rendered: Vec<String> = starts.iter().copied().map(format_hhmm).collect();

        for excluded in ["11:45", "12:00", "12:15", "12:30", "12:45"] {
            assert!(!rendered.contains(&excluded.to_string()), "{excluded}");
        }
        assert!(rendered.contains(&"11:30".to_string()));
        assert!(rendered.contains(&"13:00".to_string()));
        assert_eq!(rendered.len(), 30);
    }

    #[test]
    fn occupied_slot_is_hidden_at_capacity_one() {
        let occupied = vec![(at_minutes(monday(), 600), at_minutes(monday(), 630))];
        let starts = available_starts(&business_day(), monday(), &params(), &occupied, earlier_now());
        let rendered: Vec<String> = starts.iter().copied().map(format_hhmm).collect();

        // 09:45, 10:00 and 10:15 all intersect [10:00, 10:30).
        for excluded in ["09:45", "10:00", "10:15"] {
            assert!(!rendered.contains(&excluded.to_string()), "{excluded}");
        }
        assert!(rendered.contains(&"09:30".to_string()));
        assert!(rendered.contains(&"10:30".to_string()));
    }

    #[test]
    fn capacity_two_tolerates_one_overlapping_booking() {
        let mut two_seats = params();
        two_seats.capacity = 2;
        let occupied = vec![(at_minutes(monday(), 600), at_minutes(monday(), 630))];
        let starts =
            available_starts(&business_day(), monday(), &two_seats, &occupied, earlier_now());
        let rendered: Vec<String> = starts.iter().copied().map(format_hhmm).collect();

        assert!(rendered.contains(&"10:00".to_string()));
        assert_eq!(starts.len(), 35);
    }

    #[test]
    fn todays_elapsed_starts_are_dropped() {
        let now: DateTime<Utc> = "2025-06-02T11:00:00Z".parse().unwrap();
        let starts = available_starts(&business_day(), monday(), &params(), &[], now);

        // 11:00 itself is dropped (t <= now), 11:15 is the first offer.
        assert_eq!(format_hhmm(starts[0]), "11:15");
    }

    #[test]
    fn dates_beyond_the_booking_horizon_are_empty() {
        let mut near = params();
        near.max_future_days = 7;
        let far_date = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
        let starts = available_starts(&business_day(), far_date, &near, &[], earlier_now());
        assert!(starts.is_empty());
    }

    #[test]
    fn past_dates_are_empty() {
        let now: DateTime<Utc> = "2025-06-03T08:00:00Z".parse().unwrap();
        let starts = available_starts(&business_day(), monday(), &params(), &[], now);
        assert!(starts.is_empty());
    }

    #[test]
    fn buffer_shrinks_the_tail_of_the_day() {
        let mut buffered = params();
        buffered.buffer_minutes = 15;
        let starts = available_starts(&business_day(), monday(), &buffered, &[], earlier_now());

        // 17:30 + 30 + 15 > 18:00, so the walk stops at 17:15.
        assert_eq!(format_hhmm(*starts.last().unwrap()), "17:15");
        assert_eq!(starts.len(), 34);
    }
}
