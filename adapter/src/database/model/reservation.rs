use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    reservation::{status::ReservationStatus, Reservation},
    slot::BookingDuration,
    space::Space,
};
use shared::error::AppError;
use sqlx::FromRow;
use uuid::Uuid;

// 予約の一覧・単体取得のどちらでも使う型
// space と status は文字列のまま読み出し、ドメイン型への変換時に検証する
#[derive(Debug, FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub space: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            space,
            session_date,
            start_time,
            duration_hours,
            status,
            created_at,
            confirmed_at,
            cancelled_at,
            completed_at,
        } = value;

        let space = space.parse::<Space>().map_err(|_| {
            AppError::ConversionEntityError(format!(
                "reservation {reservation_id} has an unknown space: {space}"
            ))
        })?;
        let status = status.parse::<ReservationStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!(
                "reservation {reservation_id} has an unknown status: {status}"
            ))
        })?;
        let duration = u32::try_from(duration_hours)
            .ok()
            .and_then(|hours| BookingDuration::hours(hours).ok())
            .ok_or_else(|| {
                AppError::ConversionEntityError(format!(
                    "reservation {reservation_id} has an invalid duration: {duration_hours}"
                ))
            })?;

        Ok(Reservation {
            reservation_id: reservation_id.into(),
            space,
            session_date,
            start_time,
            duration,
            status,
            created_at,
            confirmed_at,
            cancelled_at,
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> ReservationRow {
        ReservationRow {
            reservation_id: Uuid::new_v4(),
            space: "black-zone".into(),
            session_date: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            duration_hours: 2,
            status: "confirmed".into(),
            created_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
            confirmed_at: Some(Utc.with_ymd_and_hms(2025, 7, 2, 9, 0, 0).unwrap()),
            cancelled_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn converts_a_stored_row() {
        let reservation = Reservation::try_from(row()).unwrap();
        assert_eq!(reservation.space, Space::BlackZone);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.duration.as_hours(), 2);
        assert_eq!(reservation.occupied_slots().count(), 2);
    }

    #[test]
    fn rejects_rows_the_domain_cannot_represent() {
        let mut bad_space = row();
        bad_space.space = "all".into();
        assert!(matches!(
            Reservation::try_from(bad_space),
            Err(AppError::ConversionEntityError(_))
        ));

        let mut bad_duration = row();
        bad_duration.duration_hours = 0;
        assert!(Reservation::try_from(bad_duration).is_err());

        let mut oversized = row();
        oversized.duration_hours = 80_000_000;
        assert!(matches!(
            Reservation::try_from(oversized),
            Err(AppError::ConversionEntityError(_))
        ));

        let mut bad_status = row();
        bad_status.status = "archived".into();
        assert!(Reservation::try_from(bad_status).is_err());
    }
}
