use garde::Validate;
use kernel::engine::occupancy::{DayOccupancy, MonthOccupancy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Validate)]
pub struct CalendarQuery {
    #[garde(range(min = 1970, max = 9999))]
    pub year: i32,
    #[garde(range(min = 1, max = 12))]
    pub month: u32,
    #[garde(skip)]
    pub space: Option<String>,
}

// { "2025-07-05": "busy", ... } の形で返す
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CalendarResponse(pub BTreeMap<String, DayOccupancy>);

impl From<MonthOccupancy> for CalendarResponse {
    fn from(value: MonthOccupancy) -> Self {
        Self(
            value
                .into_iter()
                .map(|(date, occupancy)| (date.format("%Y-%m-%d").to_string(), occupancy))
                .collect(),
        )
    }
}
