// ハンドラのテスト用に、データベースの代わりにメモリ上で予約を保持するリポジトリ
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use kernel::engine::{
    availability::{check_availability, AvailabilityQuery, ALREADY_BOOKED},
    occupancy::OccupancyPolicy,
};
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        status::ReservationStatus,
        Reservation,
    },
    slot::{BookingDuration, SlotCalendar},
    snapshot::{DateRange, ReservationSnapshot},
    space::{Space, SpaceSelector},
};
use kernel::repository::{health::HealthCheckRepository, reservation::ReservationRepository};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use std::sync::{Arc, Mutex};

pub struct FakeHealthCheck;

#[async_trait]
impl HealthCheckRepository for FakeHealthCheck {
    async fn check_db(&self) -> bool {
        true
    }
}

pub struct InMemoryReservationRepository {
    calendar: SlotCalendar,
    reservations: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationRepository {
    fn all(&self) -> Vec<Reservation> {
        self.reservations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_in_range(
        &self,
        range: DateRange,
        space: SpaceSelector,
    ) -> AppResult<Vec<Reservation>> {
        Ok(self
            .all()
            .into_iter()
            .filter(|r| range.contains(r.session_date) && space.includes(r.space))
            .collect())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.all()
            .into_iter()
            .find(|r| r.reservation_id == reservation_id)
            .ok_or_else(|| AppError::EntityNotFound("not found".into()))
    }

    async fn create(&self, event: CreateReservation) -> AppResult<Vec<ReservationId>> {
        let mut reservations = self.reservations.lock().unwrap();
        let snapshot: ReservationSnapshot = reservations.iter().cloned().collect();
        let query = AvailabilityQuery::new(
            event.space,
            event.session_date,
            event.start_time,
            event.duration,
        );
        let verdict = check_availability(&self.calendar, &query, &snapshot);
        if !verdict.available {
            return Err(AppError::UnprocessableEntity(
                verdict.reason.unwrap_or_else(|| ALREADY_BOOKED.into()),
            ));
        }
        let mut ids = Vec::new();
        for space in event.space.spaces() {
            let reservation_id = ReservationId::new();
            reservations.push(Reservation {
                reservation_id,
                space,
                session_date: event.session_date,
                start_time: event.start_time,
                duration: event.duration,
                status: ReservationStatus::Pending,
                created_at: event.requested_at,
                confirmed_at: None,
                cancelled_at: None,
                completed_at: None,
            });
            ids.push(reservation_id);
        }
        Ok(ids)
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation> {
        let mut reservations = self.reservations.lock().unwrap();
        let reservation = reservations
            .iter_mut()
            .find(|r| r.reservation_id == event.reservation_id)
            .ok_or_else(|| AppError::EntityNotFound("not found".into()))?;
        let today = event.requested_at.with_timezone(&Local).date_naive();
        let next = reservation.status.transition(
            event.status,
            event.requested_by,
            reservation.session_date,
            today,
        )?;
        reservation.record_status(next, event.requested_at);
        Ok(reservation.clone())
    }
}

pub fn registry_with(reservations: Vec<Reservation>) -> AppRegistry {
    let calendar = SlotCalendar::default();
    AppRegistry::from_parts(
        Arc::new(FakeHealthCheck),
        Arc::new(InMemoryReservationRepository {
            calendar,
            reservations: Mutex::new(reservations),
        }),
        calendar,
        OccupancyPolicy::default(),
    )
}

pub fn confirmed(space: Space, date: &str, start_hour: u32, hours: u32) -> Reservation {
    Reservation {
        reservation_id: ReservationId::new(),
        space,
        session_date: date.parse::<NaiveDate>().unwrap(),
        start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        duration: BookingDuration::hours(hours).unwrap(),
        status: ReservationStatus::Confirmed,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        confirmed_at: Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()),
        cancelled_at: None,
        completed_at: None,
    }
}
