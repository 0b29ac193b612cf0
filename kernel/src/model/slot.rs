use chrono::{NaiveTime, Timelike};
use std::{fmt, str::FromStr};
use thiserror::Error;

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;
// 1 セッションは 1 日を超えない
pub const MAX_DURATION_HOURS: u32 = HOURS_PER_DAY;

/// One hour-wide unit of bookable time, identified by its starting hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u32);

impl TimeSlot {
    pub fn new(hour: u32) -> Option<Self> {
        (hour < HOURS_PER_DAY).then_some(Self(hour))
    }

    pub fn hour(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Session length in whole hours. Package codes such as `"2h"` are parsed
/// into this once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingDuration(u32);

impl BookingDuration {
    pub fn hours(hours: u32) -> Result<Self, CalendarError> {
        if hours == 0 {
            return Err(CalendarError::InvalidDuration(
                "the duration must be at least one hour".into(),
            ));
        }
        if hours > MAX_DURATION_HOURS {
            return Err(CalendarError::InvalidDuration(format!(
                "the duration must not exceed {MAX_DURATION_HOURS} hours"
            )));
        }
        Ok(Self(hours))
    }

    pub fn as_hours(self) -> u32 {
        self.0
    }
}

impl FromStr for BookingDuration {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix(['h', 'H'])
            .unwrap_or(trimmed)
            .trim_end();
        // "1.5" や "-2" は整数としてパースできないのでここで弾かれる
        let hours = digits.parse::<u32>().map_err(|_| {
            CalendarError::InvalidDuration(format!(
                "the duration must be a whole number of hours, got \"{trimmed}\""
            ))
        })?;
        Self::hours(hours)
    }
}

impl fmt::Display for BookingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("the studio opens at {opening_hour}:00")]
    BeforeOpening { opening_hour: u32 },
    #[error("the session would end at {end_hour}:00, after the {closing_hour}:00 closing time")]
    AfterClosing { end_hour: u32, closing_hour: u32 },
    #[error("sessions start on the hour")]
    OffTheHour,
    #[error("{0}")]
    InvalidDuration(String),
    #[error("invalid operating hours: {0}")]
    InvalidOperatingHours(String),
}

/// The facility's operating hours, discretised into hour slots.
///
/// This is a plain value handed to every query; nothing about it is global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCalendar {
    opening_hour: u32,
    closing_hour: u32,
    max_duration_hours: u32,
}

impl SlotCalendar {
    pub fn new(
        opening_hour: u32,
        closing_hour: u32,
        max_duration_hours: u32,
    ) -> Result<Self, CalendarError> {
        if opening_hour >= closing_hour || closing_hour > HOURS_PER_DAY {
            return Err(CalendarError::InvalidOperatingHours(format!(
                "opening {opening_hour}:00 must come before closing {closing_hour}:00 within one day"
            )));
        }
        if max_duration_hours == 0 || max_duration_hours > MAX_DURATION_HOURS {
            return Err(CalendarError::InvalidOperatingHours(format!(
                "the maximum duration must be between 1 and {MAX_DURATION_HOURS} hours"
            )));
        }
        Ok(Self {
            opening_hour,
            closing_hour,
            max_duration_hours,
        })
    }

    pub fn opening_hour(&self) -> u32 {
        self.opening_hour
    }

    pub fn closing_hour(&self) -> u32 {
        self.closing_hour
    }

    pub fn max_duration_hours(&self) -> u32 {
        self.max_duration_hours
    }

    pub fn slots_per_day(&self) -> u32 {
        self.closing_hour - self.opening_hour
    }

    pub fn operating_slots(&self) -> Vec<TimeSlot> {
        (self.opening_hour..self.closing_hour).map(TimeSlot).collect()
    }

    pub fn is_operating(&self, slot: TimeSlot) -> bool {
        (self.opening_hour..self.closing_hour).contains(&slot.hour())
    }

    /// Validates a requested session and returns the slots it would occupy,
    /// in ascending order.
    pub fn request_slots(
        &self,
        start: NaiveTime,
        duration: BookingDuration,
    ) -> Result<Vec<TimeSlot>, CalendarError> {
        if duration.as_hours() > self.max_duration_hours {
            return Err(CalendarError::InvalidDuration(format!(
                "sessions last at most {} hours",
                self.max_duration_hours
            )));
        }
        if start.minute() != 0 || start.second() != 0 {
            return Err(CalendarError::OffTheHour);
        }

        let start_hour = start.hour();
        if start_hour < self.opening_hour {
            return Err(CalendarError::BeforeOpening {
                opening_hour: self.opening_hour,
            });
        }
        let end_hour = start_hour + duration.as_hours();
        if end_hour > self.closing_hour {
            return Err(CalendarError::AfterClosing {
                end_hour,
                closing_hour: self.closing_hour,
            });
        }

        Ok((start_hour..end_hour).map(TimeSlot).collect())
    }
}

impl Default for SlotCalendar {
    fn default() -> Self {
        Self {
            opening_hour: 8,
            closing_hour: 23,
            max_duration_hours: 12,
        }
    }
}

/// Every slot a session touches. A start off the hour still blocks the
/// whole hour it falls into, and so does a partially used last hour.
pub fn covered_slots(start: NaiveTime, duration: BookingDuration) -> impl Iterator<Item = TimeSlot> {
    let start_minute = start.hour() * MINUTES_PER_HOUR + start.minute();
    let end_minute =
        start_minute.saturating_add(duration.as_hours().saturating_mul(MINUTES_PER_HOUR));
    let first = start_minute / MINUTES_PER_HOUR;
    let last = end_minute.div_ceil(MINUTES_PER_HOUR).min(HOURS_PER_DAY);
    (first..last).map(TimeSlot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn hours(slots: &[TimeSlot]) -> Vec<u32> {
        slots.iter().map(|s| s.hour()).collect()
    }

    #[test]
    fn session_ending_exactly_at_closing_is_allowed() {
        let calendar = SlotCalendar::default();
        let slots = calendar
            .request_slots(at(22, 0), BookingDuration::hours(1).unwrap())
            .unwrap();
        assert_eq!(hours(&slots), vec![22]);
    }

    #[test]
    fn session_running_past_closing_is_out_of_hours() {
        let calendar = SlotCalendar::default();
        let err = calendar
            .request_slots(at(22, 0), BookingDuration::hours(2).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            CalendarError::AfterClosing {
                end_hour: 24,
                closing_hour: 23
            }
        );
        assert_eq!(
            err.to_string(),
            "the session would end at 24:00, after the 23:00 closing time"
        );
    }

    #[test]
    fn session_before_opening_is_out_of_hours() {
        let calendar = SlotCalendar::default();
        let err = calendar
            .request_slots(at(7, 0), BookingDuration::hours(1).unwrap())
            .unwrap_err();
        assert_eq!(err.to_string(), "the studio opens at 8:00");
    }

    #[test]
    fn start_must_be_on_the_hour() {
        let calendar = SlotCalendar::default();
        let err = calendar
            .request_slots(at(10, 30), BookingDuration::hours(1).unwrap())
            .unwrap_err();
        assert_eq!(err, CalendarError::OffTheHour);
    }

    #[test]
    fn duration_above_configured_maximum_is_invalid() {
        let calendar = SlotCalendar::new(8, 23, 4).unwrap();
        let err = calendar
            .request_slots(at(9, 0), BookingDuration::hours(5).unwrap())
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDuration(_)));
    }

    #[test]
    fn eight_hour_session_yields_eight_ascending_slots() {
        let calendar = SlotCalendar::default();
        let slots = calendar
            .request_slots(at(9, 0), BookingDuration::hours(8).unwrap())
            .unwrap();
        assert_eq!(hours(&slots), (9..17).collect::<Vec<_>>());
        assert_eq!(slots.first().unwrap().to_string(), "09:00");
        assert_eq!(slots.last().unwrap().to_string(), "16:00");
    }

    #[test]
    fn parses_package_codes_once() {
        assert_eq!("2h".parse::<BookingDuration>().unwrap().as_hours(), 2);
        assert_eq!(" 4H ".parse::<BookingDuration>().unwrap().as_hours(), 4);
        assert_eq!("12".parse::<BookingDuration>().unwrap().as_hours(), 12);
        assert_eq!("24h".parse::<BookingDuration>().unwrap().as_hours(), 24);
        for bad in ["0", "0h", "25h", "80000000", "-1", "1.5", "", "two"] {
            assert!(
                matches!(
                    bad.parse::<BookingDuration>(),
                    Err(CalendarError::InvalidDuration(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_inverted_operating_hours() {
        assert!(SlotCalendar::new(23, 8, 12).is_err());
        assert!(SlotCalendar::new(8, 25, 12).is_err());
        assert!(SlotCalendar::new(8, 23, 0).is_err());
        assert!(SlotCalendar::new(8, 23, 25).is_err());
        assert_eq!(SlotCalendar::new(8, 23, 12).unwrap().slots_per_day(), 15);
    }

    #[test]
    fn covered_slots_round_out_partial_hours() {
        let two = BookingDuration::hours(2).unwrap();
        let on_the_hour: Vec<_> = covered_slots(at(14, 0), two).map(TimeSlot::hour).collect();
        assert_eq!(on_the_hour, vec![14, 15]);
        let half_past: Vec<_> = covered_slots(at(14, 30), two).map(TimeSlot::hour).collect();
        assert_eq!(half_past, vec![14, 15, 16]);
        let late: Vec<_> = covered_slots(at(23, 0), two).map(TimeSlot::hour).collect();
        assert_eq!(late, vec![23]);
    }

    #[test]
    fn durations_longer_than_a_day_are_rejected() {
        assert!(matches!(
            BookingDuration::hours(MAX_DURATION_HOURS + 1),
            Err(CalendarError::InvalidDuration(_))
        ));
        assert!(BookingDuration::hours(80_000_000).is_err());

        // 最大長でも 1 日の終わりで打ち切られる
        let longest = BookingDuration::hours(MAX_DURATION_HOURS).unwrap();
        let slots: Vec<_> = covered_slots(at(23, 30), longest).map(TimeSlot::hour).collect();
        assert_eq!(slots, vec![23]);
        assert_eq!(covered_slots(at(0, 0), longest).count(), 24);
    }

    #[test]
    fn operating_slots_span_opening_to_closing() {
        let calendar = SlotCalendar::new(9, 12, 3).unwrap();
        let slots = calendar.operating_slots();
        assert_eq!(hours(&slots), vec![9, 10, 11]);
        assert_eq!(slots.len() as u32, calendar.slots_per_day());
        assert!(slots.iter().all(|s| calendar.is_operating(*s)));
        assert!(!calendar.is_operating(TimeSlot::new(12).unwrap()));
    }
}
