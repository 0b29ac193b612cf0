use super::{parse_date, parse_space, parse_time};
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        status::{Actor, ReservationStatus},
        Reservation,
    },
    slot::BookingDuration,
    space::Space,
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 1))]
    pub space: String,
    #[garde(length(min = 1))]
    pub date: String,
    #[garde(length(min = 1))]
    pub time: String,
    // "2h" のようなパッケージ表記も受け付ける。省略時は 1 時間
    #[garde(skip)]
    pub duration: Option<String>,
}

impl CreateReservationRequest {
    pub fn into_event(self, requested_at: DateTime<Utc>) -> AppResult<CreateReservation> {
        let CreateReservationRequest {
            space,
            date,
            time,
            duration,
        } = self;
        let duration = match duration.as_deref().map(str::trim) {
            None | Some("") => BookingDuration::hours(1),
            Some(raw) => raw.parse::<BookingDuration>(),
        }
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
        Ok(CreateReservation::new(
            parse_space(&space)?,
            parse_date(&date)?,
            parse_time(&time)?,
            duration,
            requested_at,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    #[garde(skip)]
    pub status: ReservationStatus,
    #[garde(skip)]
    pub requested_by: Actor,
}

#[derive(new)]
pub struct UpdateReservationStatusRequestWithId(ReservationId, UpdateReservationStatusRequest);

impl UpdateReservationStatusRequestWithId {
    pub fn into_event(self, requested_at: DateTime<Utc>) -> UpdateReservationStatus {
        let UpdateReservationStatusRequestWithId(
            reservation_id,
            UpdateReservationStatusRequest {
                status,
                requested_by,
            },
        ) = self;
        UpdateReservationStatus::new(reservation_id, status, requested_by, requested_at)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationsResponse {
    pub reservation_ids: Vec<ReservationId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub space: Space,
    pub date: NaiveDate,
    pub time: String,
    pub duration_hours: u32,
    pub slots: Vec<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let slots = value.occupied_slots().map(|s| s.to_string()).collect();
        let Reservation {
            reservation_id,
            space,
            session_date,
            start_time,
            duration,
            status,
            created_at,
            confirmed_at,
            cancelled_at,
            completed_at,
        } = value;
        Self {
            reservation_id,
            space,
            date: session_date,
            time: start_time.format("%H:%M").to_string(),
            duration_hours: duration.as_hours(),
            slots,
            status,
            created_at,
            confirmed_at,
            cancelled_at,
            completed_at,
        }
    }
}
