use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;
use chrono::Local;
use derive_new::new;
use kernel::engine::availability::{check_availability, AvailabilityQuery, ALREADY_BOOKED};
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        status::{ReservationStatus, OCCUPYING_STATUSES},
        Reservation,
    },
    slot::SlotCalendar,
    snapshot::{DateRange, ReservationSnapshot},
    space::SpaceSelector,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

// PostgreSQL の serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";

const RESERVATION_COLUMNS: &str = r#"
    reservation_id,
    space,
    session_date,
    start_time,
    duration_hours,
    status,
    created_at,
    confirmed_at,
    cancelled_at,
    completed_at
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    calendar: SlotCalendar,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    #[tracing::instrument(skip(self))]
    async fn find_in_range(
        &self,
        range: DateRange,
        space: SpaceSelector,
    ) -> AppResult<Vec<Reservation>> {
        let space_filter = match space {
            SpaceSelector::All => None,
            SpaceSelector::Single(s) => Some(s.to_string()),
        };
        let sql = format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE session_date BETWEEN $1 AND $2
                  AND ($3::VARCHAR IS NULL OR space = $3)
                ORDER BY session_date ASC, start_time ASC, created_at ASC
            "#
        );
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(range.start())
            .bind(range.end())
            .bind(space_filter)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id.raw())
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("reservation {reservation_id} was not found"))
            })
            .and_then(Reservation::try_from)
    }

    #[tracing::instrument(skip(self), fields(space = %event.space, date = %event.session_date))]
    async fn create(&self, event: CreateReservation) -> AppResult<Vec<ReservationId>> {
        let mut tx = self.db.begin().await?;

        // 同じ日付・スペースへの同時予約で二重予約が起きないよう、
        // 読み込み・空き確認・登録を SERIALIZABLE なトランザクション内で行う
        self.set_transaction_serializable(&mut tx).await?;

        {
            let occupying: Vec<String> = OCCUPYING_STATUSES.iter().map(|s| s.to_string()).collect();
            let sql = format!(
                r#"
                    SELECT {RESERVATION_COLUMNS}
                    FROM reservations
                    WHERE session_date = $1
                      AND status = ANY($2)
                "#
            );
            let snapshot = sqlx::query_as::<_, ReservationRow>(&sql)
                .bind(event.session_date)
                .bind(occupying)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| booking_conflict_or(e, AppError::SpecificOperationError))?
                .into_iter()
                .map(Reservation::try_from)
                .collect::<AppResult<ReservationSnapshot>>()?;

            let query = AvailabilityQuery::new(
                event.space,
                event.session_date,
                event.start_time,
                event.duration,
            );
            let verdict = check_availability(&self.calendar, &query, &snapshot);
            if !verdict.available {
                tracing::info!(reason = ?verdict.reason, "reservation rejected");
                return Err(AppError::UnprocessableEntity(
                    verdict.reason.unwrap_or_else(|| ALREADY_BOOKED.to_string()),
                ));
            }
        }

        // 全スペース予約の場合はスペースごとに 1 行ずつ登録する
        let mut reservation_ids = Vec::new();
        for space in event.space.spaces() {
            let reservation_id = ReservationId::new();
            let res = sqlx::query(
                r#"
                    INSERT INTO reservations
                    (reservation_id, space, session_date, start_time,
                    duration_hours, status, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(reservation_id.raw())
            .bind(space.as_ref())
            .bind(event.session_date)
            .bind(event.start_time)
            .bind(event.duration.as_hours() as i32)
            .bind(ReservationStatus::Pending.as_ref())
            .bind(event.requested_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| booking_conflict_or(e, AppError::SpecificOperationError))?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "No reservation record has been created".into(),
                ));
            }
            reservation_ids.push(reservation_id);
        }

        tx.commit()
            .await
            .map_err(|e| booking_conflict_or(e, AppError::TransactionError))?;

        Ok(reservation_ids)
    }

    #[tracing::instrument(skip(self), fields(reservation_id = %event.reservation_id))]
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1 FOR UPDATE"
        );
        let current: Reservation = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(event.reservation_id.raw())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "reservation {} was not found",
                    event.reservation_id
                ))
            })?
            .try_into()?;

        // 完了可否の判定は施設のローカル日付で行う
        let today = event.requested_at.with_timezone(&Local).date_naive();
        let next = current.status.transition(
            event.status,
            event.requested_by,
            current.session_date,
            today,
        )?;

        let mut updated = current;
        updated.record_status(next, event.requested_at);

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    confirmed_at = $3,
                    cancelled_at = $4,
                    completed_at = $5
                WHERE reservation_id = $1
            "#,
        )
        .bind(updated.reservation_id.raw())
        .bind(updated.status.as_ref())
        .bind(updated.confirmed_at)
        .bind(updated.cancelled_at)
        .bind(updated.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(updated)
    }
}

impl ReservationRepositoryImpl {
    // create, update_status でトランザクション分離レベルを SERIALIZABLE にするための内部メソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

fn is_serialization_failure(code: Option<&str>) -> bool {
    code == Some(SERIALIZATION_FAILURE)
}

// 同時に走った予約とのシリアライズ失敗は空き枠の競合なので、500 ではなく 422 で返す
fn booking_conflict_or(e: sqlx::Error, fallback: fn(sqlx::Error) -> AppError) -> AppError {
    let code = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned());
    if is_serialization_failure(code.as_deref()) {
        tracing::info!("reservation lost a race with a concurrent booking");
        return AppError::UnprocessableEntity(ALREADY_BOOKED.to_string());
    }
    fallback(e)
}
