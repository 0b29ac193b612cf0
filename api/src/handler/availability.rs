use crate::model::availability::{AvailabilityQueryParams, AvailabilityRequest, AvailabilityResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use kernel::engine::availability::{check_availability, AvailabilityQuery, AvailabilityVerdict};
use kernel::model::snapshot::{DateRange, ReservationSnapshot};
use registry::AppRegistry;
use shared::error::AppResult;

#[tracing::instrument(skip_all)]
pub async fn show_availability(
    Query(query): Query<AvailabilityQueryParams>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let request = AvailabilityRequest::try_from(query)?;
    let calendar = registry.slot_calendar();

    // 営業時間・長さの不備はデータベースを見る前に判定できる
    let duration = match request
        .duration
        .and_then(|d| calendar.request_slots(request.start_time, d).map(|_| d))
    {
        Ok(duration) => duration,
        Err(e) => {
            tracing::debug!(reason = %e, "request rejected by the slot calendar");
            return Ok(Json(AvailabilityVerdict::rejected(e.to_string()).into()));
        }
    };

    let reservations = registry
        .reservation_repository()
        .find_in_range(DateRange::single(request.date), request.space)
        .await?;
    let snapshot = ReservationSnapshot::new(reservations);
    let query = AvailabilityQuery::new(request.space, request.date, request.start_time, duration);
    let verdict = check_availability(&calendar, &query, &snapshot);

    tracing::debug!(
        available = verdict.available,
        conflicts = verdict.conflicting_slots.len(),
        "availability checked"
    );
    Ok(Json(verdict.into()))
}
