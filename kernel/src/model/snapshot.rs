use crate::model::{
    reservation::Reservation,
    slot::TimeSlot,
    space::{Space, SpaceSelector},
};
use chrono::{Months, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive range of facility-local days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Slot -> spaces holding that slot, for one day.
pub type SlotMap = BTreeMap<TimeSlot, BTreeSet<Space>>;

/// Read-only view of the reservations loaded for a date range. The engine
/// never mutates it, so one snapshot can serve concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct ReservationSnapshot {
    reservations: Vec<Reservation>,
}

impl ReservationSnapshot {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    pub fn occupying_on(&self, date: NaiveDate) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter().filter(move |r| r.occupies_on(date))
    }

    /// Builds the slot map for `date`, restricted to the spaces the selector
    /// covers. Cancelled and completed reservations never appear in it.
    pub fn slot_map(&self, date: NaiveDate, selector: SpaceSelector) -> SlotMap {
        let mut map = SlotMap::new();
        for reservation in self
            .occupying_on(date)
            .filter(|r| selector.includes(r.space))
        {
            for slot in reservation.occupied_slots() {
                map.entry(slot).or_default().insert(reservation.space);
            }
        }
        map
    }
}

impl From<Vec<Reservation>> for ReservationSnapshot {
    fn from(value: Vec<Reservation>) -> Self {
        Self::new(value)
    }
}

impl FromIterator<Reservation> for ReservationSnapshot {
    fn from_iter<T: IntoIterator<Item = Reservation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
