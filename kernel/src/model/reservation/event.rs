use crate::model::{
    id::ReservationId,
    reservation::status::{Actor, ReservationStatus},
    slot::BookingDuration,
    space::SpaceSelector,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use derive_new::new;

// space が SpaceSelector::All の場合はスペースごとに 1 件ずつ予約を作る
#[derive(new, Debug, Clone)]
pub struct CreateReservation {
    pub space: SpaceSelector,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration: BookingDuration,
    pub requested_at: DateTime<Utc>,
}

#[derive(new, Debug, Clone)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub requested_by: Actor,
    pub requested_at: DateTime<Utc>,
}
