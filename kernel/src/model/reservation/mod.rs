use crate::model::{
    id::ReservationId,
    slot::{covered_slots, BookingDuration, TimeSlot},
    space::Space,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub mod event;
pub mod status;

use status::ReservationStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub space: Space,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration: BookingDuration,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reservation {
    pub fn occupied_slots(&self) -> impl Iterator<Item = TimeSlot> {
        covered_slots(self.start_time, self.duration)
    }

    // 競合判定・カレンダー集計の両方がこの判定を経由する
    pub fn occupies_on(&self, date: NaiveDate) -> bool {
        self.session_date == date && self.status.is_occupying()
    }

    // 遷移済みのステータスを反映し、対応する日時を記録する
    pub fn record_status(&mut self, status: ReservationStatus, at: DateTime<Utc>) {
        self.status = status;
        match status {
            ReservationStatus::Confirmed => self.confirmed_at = Some(at),
            ReservationStatus::Cancelled => self.cancelled_at = Some(at),
            ReservationStatus::Completed => self.completed_at = Some(at),
            ReservationStatus::Pending => {}
        }
    }
}
