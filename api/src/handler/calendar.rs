use crate::model::{
    calendar::{CalendarQuery, CalendarResponse},
    parse_space,
};
use axum::{
    extract::{Query, State},
    Json,
};
use garde::Validate;
use kernel::engine::occupancy::aggregate_range;
use kernel::model::{
    snapshot::{DateRange, ReservationSnapshot},
    space::SpaceSelector,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

#[tracing::instrument(skip_all)]
pub async fn show_month_calendar(
    Query(query): Query<CalendarQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CalendarResponse>> {
    query.validate(&())?;

    let space = match query.space.as_deref() {
        None | Some("") => SpaceSelector::All,
        Some(raw) => parse_space(raw)?,
    };
    let range = DateRange::month(query.year, query.month).ok_or_else(|| {
        AppError::InvalidParameter(format!("{}-{} is not a valid month", query.year, query.month))
    })?;

    let reservations = registry
        .reservation_repository()
        .find_in_range(range, space)
        .await?;
    let snapshot = ReservationSnapshot::new(reservations);

    Ok(Json(
        aggregate_range(
            &registry.slot_calendar(),
            &registry.occupancy_policy(),
            range,
            space,
            &snapshot,
        )
        .into(),
    ))
}
