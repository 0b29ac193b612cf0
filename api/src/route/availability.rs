use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::{availability::show_availability, calendar::show_month_calendar};

pub fn build_availability_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/availability", get(show_availability))
        .route("/calendar", get(show_month_calendar))
}
