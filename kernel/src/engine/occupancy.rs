use crate::model::{
    slot::SlotCalendar,
    snapshot::{DateRange, ReservationSnapshot},
    space::SpaceSelector,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayOccupancy {
    Available,
    Partial,
    Busy,
    Full,
}

/// Ratio thresholds that turn a day's occupied/total slot count into a
/// [`DayOccupancy`]. This is the only place the bands are defined.
///
/// | occupied / total        | label       |
/// |-------------------------|-------------|
/// | 0                       | `available` |
/// | below `busy_from`       | `partial`   |
/// | below `full_from`       | `busy`      |
/// | `full_from` and above   | `full`      |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyPolicy {
    busy_from: f64,
    full_from: f64,
}

impl OccupancyPolicy {
    pub fn new(busy_from: f64, full_from: f64) -> Option<Self> {
        let valid = busy_from > 0.0 && busy_from <= full_from && full_from <= 1.0;
        valid.then_some(Self {
            busy_from,
            full_from,
        })
    }

    pub fn classify(&self, occupied: u32, total: u32) -> DayOccupancy {
        if occupied == 0 {
            return DayOccupancy::Available;
        }
        if total == 0 {
            return DayOccupancy::Full;
        }
        let ratio = f64::from(occupied) / f64::from(total);
        if ratio >= self.full_from {
            DayOccupancy::Full
        } else if ratio >= self.busy_from {
            DayOccupancy::Busy
        } else {
            DayOccupancy::Partial
        }
    }
}

impl Default for OccupancyPolicy {
    fn default() -> Self {
        Self {
            busy_from: 0.5,
            full_from: 1.0,
        }
    }
}

pub type MonthOccupancy = BTreeMap<NaiveDate, DayOccupancy>;

/// Occupied (space, slot) pairs and the bookable total for one day.
pub fn day_load(
    calendar: &SlotCalendar,
    date: NaiveDate,
    selector: SpaceSelector,
    snapshot: &ReservationSnapshot,
) -> (u32, u32) {
    let total = calendar.slots_per_day() * selector.space_count();
    // slot_map はスペースを集合で持つので、同じ枠の重複予約は 1 回しか数えない
    let occupied = snapshot
        .slot_map(date, selector)
        .iter()
        .filter(|(slot, _)| calendar.is_operating(**slot))
        .map(|(_, spaces)| spaces.len() as u32)
        .sum();
    (occupied, total)
}

pub fn aggregate_range(
    calendar: &SlotCalendar,
    policy: &OccupancyPolicy,
    range: DateRange,
    selector: SpaceSelector,
    snapshot: &ReservationSnapshot,
) -> MonthOccupancy {
    range
        .days()
        .map(|date| {
            let (occupied, total) = day_load(calendar, date, selector, snapshot);
            (date, policy.classify(occupied, total))
        })
        .collect()
}

/// Labels every day of `year`/`month`. Returns `None` for a month that does
/// not exist.
pub fn aggregate_month(
    calendar: &SlotCalendar,
    policy: &OccupancyPolicy,
    year: i32,
    month: u32,
    selector: SpaceSelector,
    snapshot: &ReservationSnapshot,
) -> Option<MonthOccupancy> {
    let range = DateRange::month(year, month)?;
    Some(aggregate_range(calendar, policy, range, selector, snapshot))
}
