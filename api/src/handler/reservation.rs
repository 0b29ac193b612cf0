use crate::model::reservation::{
    CreateReservationRequest, CreatedReservationsResponse, ReservationResponse,
    UpdateReservationStatusRequest, UpdateReservationStatusRequestWithId,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::ReservationId;
use registry::AppRegistry;
use shared::error::AppResult;

// 新規予約は pending で作成される。空きがなければ 422 を返す
#[tracing::instrument(skip_all)]
pub async fn create_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreatedReservationsResponse>)> {
    req.validate(&())?;

    let event = req.into_event(chrono::Utc::now())?;
    let reservation_ids = registry.reservation_repository().create(event).await?;
    tracing::info!(count = reservation_ids.len(), "reservation created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationsResponse { reservation_ids }),
    ))
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

#[tracing::instrument(skip_all)]
pub async fn update_reservation_status(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let event = UpdateReservationStatusRequestWithId::new(reservation_id, req)
        .into_event(chrono::Utc::now());
    registry
        .reservation_repository()
        .update_status(event)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}
