//! Session start scheduling: daily time windows, weekday allow-lists, and
//! the randomized next-start computation.
//!
//! The scheduler scans calendar days forward from today and returns a
//! uniformly random instant inside the first day whose window still has room.
//! There is no cross-day comparison: the first feasible day wins.

use anyhow::{Result, bail};
use chrono::{
    DateTime, Datelike, Days, Duration as ChronoDuration, Local, NaiveDate, NaiveTime, TimeZone,
    Weekday,
};
use rand::Rng;

use crate::common::constants::SCHEDULE_HORIZON_DAYS;

/// Daily clock-time range within which a session may start.
///
/// Immutable after construction; `end >= start` always holds (windows never
/// cross midnight). A zero-width window is legal and pins the start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end < start {
            bail!(
                "window end ({end}) must not precede window start ({start}); windows cannot cross midnight"
            );
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

/// Parse a time of day from flexible input: `H:MM`, `HH:MM`, optional `:SS`.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Ok(time);
        }
    }
    bail!("invalid time of day {trimmed:?}: use HH:MM or HH:MM:SS (e.g. 08:30)")
}

/// Normalize a comma-separated weekday list into a deduplicated allow-list.
///
/// Tokens are matched case-insensitively on their first three letters, so
/// full names ("Monday") work too. Unrecognized tokens are dropped; an empty
/// result is an error.
pub fn normalize_days(input: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let key: String = token.to_ascii_lowercase().chars().take(3).collect();
        let day = match key.as_str() {
            "mon" => Some(Weekday::Mon),
            "tue" => Some(Weekday::Tue),
            "wed" => Some(Weekday::Wed),
            "thu" => Some(Weekday::Thu),
            "fri" => Some(Weekday::Fri),
            "sat" => Some(Weekday::Sat),
            "sun" => Some(Weekday::Sun),
            _ => None,
        };
        if let Some(day) = day
            && !days.contains(&day)
        {
            days.push(day);
        }
    }
    if days.is_empty() {
        bail!("days_of_week ({input:?}) is empty or invalid: use Mon,Tue,Wed,Thu,Fri,Sat,Sun");
    }
    Ok(days)
}

/// Canonical 3-letter abbreviation for a weekday.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Compute the next eligible session start at or after `now`.
///
/// Scans up to [`SCHEDULE_HORIZON_DAYS`] calendar days. For each allowed
/// weekday, the window's lower bound is clamped to `now` (today) or the
/// day's midnight (later days); if the clamped bound still precedes the
/// window's end, a uniformly random second in the remaining range is
/// returned. If `now` is already inside today's window the result can be as
/// early as the current second.
///
/// # Errors
/// Fails when no day in the horizon yields a slot. A validated non-empty
/// weekday set recurs within 7 days, so hitting this indicates a logic bug
/// rather than a user error.
pub fn next_session_start(
    now: DateTime<Local>,
    window: &TimeWindow,
    weekdays: &[Weekday],
) -> Result<DateTime<Local>> {
    for offset in 0..SCHEDULE_HORIZON_DAYS {
        let Some(date) = now.date_naive().checked_add_days(Days::new(offset)) else {
            continue;
        };
        if !weekdays.contains(&date.weekday()) {
            continue;
        }

        // Local times can be nonexistent around DST changes; skip such days.
        let Some(window_start) = local_datetime(date, window.start) else {
            continue;
        };
        let Some(window_end) = local_datetime(date, window.end) else {
            continue;
        };

        let earliest_allowed = if offset == 0 {
            now
        } else {
            let Some(midnight) = local_datetime(date, NaiveTime::MIN) else {
                continue;
            };
            midnight
        };

        let lower = window_start.max(earliest_allowed);
        if lower > window_end {
            continue;
        }

        let span_seconds = (window_end - lower).num_seconds();
        let offset_seconds = rand::rng().random_range(0..=span_seconds);
        return Ok(lower + ChronoDuration::seconds(offset_seconds));
    }

    bail!(
        "no eligible session start within {SCHEDULE_HORIZON_DAYS} days; \
         a validated weekday list and window should make this unreachable"
    )
}

fn local_datetime(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&date.and_time(time)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            parse_time_of_day(start).unwrap(),
            parse_time_of_day(end).unwrap(),
        )
        .unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn parses_flexible_time_formats() {
        assert_eq!(
            parse_time_of_day("8:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("morning").is_err());
    }

    #[test]
    fn rejects_inverted_window() {
        let result = TimeWindow::new(
            parse_time_of_day("10:00").unwrap(),
            parse_time_of_day("08:30").unwrap(),
        );
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("must not precede window start")
        );
    }

    #[test]
    fn accepts_zero_width_window() {
        assert!(TimeWindow::new(
            parse_time_of_day("09:00").unwrap(),
            parse_time_of_day("09:00").unwrap(),
        )
        .is_ok());
    }

    #[test]
    fn normalizes_day_tokens() {
        assert_eq!(
            normalize_days("mon,TUE,Wednesday").unwrap(),
            vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]
        );
        // Unrecognized tokens are dropped, duplicates collapse
        assert_eq!(
            normalize_days("Fri, nope, fri, Friday").unwrap(),
            vec![Weekday::Fri]
        );
    }

    #[test]
    fn empty_day_list_is_an_error() {
        assert!(normalize_days("").is_err());
        assert!(normalize_days("noday,alsonotaday").is_err());
        assert!(normalize_days(" , ,").is_err());
    }

    #[test]
    fn now_inside_window_schedules_same_day() {
        // 2026-01-05 is a Monday
        let now = local(2026, 1, 5, 9, 0, 0);
        let result =
            next_session_start(now, &window("08:30", "10:00"), &[Weekday::Mon]).unwrap();
        assert_eq!(result.weekday(), Weekday::Mon);
        assert!(result >= now);
        assert!(result.time() <= parse_time_of_day("10:00").unwrap());
    }

    #[test]
    fn now_past_window_rolls_to_next_allowed_day() {
        let now = local(2026, 1, 5, 11, 0, 0);
        let result =
            next_session_start(now, &window("08:30", "10:00"), &[Weekday::Mon]).unwrap();
        // Next Monday, inside the window
        assert_eq!(result.date_naive(), now.date_naive() + Days::new(7));
        assert!(result.time() >= parse_time_of_day("08:30").unwrap());
        assert!(result.time() <= parse_time_of_day("10:00").unwrap());
    }

    #[test]
    fn zero_width_window_yields_exactly_that_instant() {
        let now = local(2026, 1, 5, 8, 0, 0);
        let result =
            next_session_start(now, &window("09:00", "09:00"), &[Weekday::Mon]).unwrap();
        assert_eq!(result, local(2026, 1, 5, 9, 0, 0));
    }

    #[test]
    fn zero_width_window_in_the_past_rolls_forward() {
        let now = local(2026, 1, 5, 9, 0, 1);
        let result =
            next_session_start(now, &window("09:00", "09:00"), &[Weekday::Mon]).unwrap();
        assert_eq!(result, local(2026, 1, 12, 9, 0, 0));
    }

    #[test]
    fn current_instant_is_not_excluded() {
        // now == window end exactly: the only remaining slot is now itself
        let now = local(2026, 1, 5, 10, 0, 0);
        let result =
            next_session_start(now, &window("08:30", "10:00"), &[Weekday::Mon]).unwrap();
        assert_eq!(result, now);
    }

    #[test]
    fn skips_disallowed_weekdays() {
        // Start from a Monday, only Thursdays allowed
        let now = local(2026, 1, 5, 9, 0, 0);
        let result =
            next_session_start(now, &window("08:30", "10:00"), &[Weekday::Thu]).unwrap();
        assert_eq!(result.weekday(), Weekday::Thu);
        assert_eq!(result.date_naive(), now.date_naive() + Days::new(3));
    }

    #[test]
    fn result_second_resolution_is_integer() {
        let now = local(2026, 1, 5, 9, 0, 0);
        let result =
            next_session_start(now, &window("08:30", "10:00"), &[Weekday::Mon]).unwrap();
        assert_eq!(result.nanosecond(), 0);
    }
}
