use super::{parse_date, parse_space, parse_time};
use chrono::{NaiveDate, NaiveTime};
use kernel::engine::availability::{AvailabilityVerdict, BlockedSlot};
use kernel::model::{
    slot::{BookingDuration, CalendarError, TimeSlot},
    space::{Space, SpaceSelector},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub const REQUIRED_PARAMETERS: &str = "date, time and space are required parameters";

// 必須項目の欠落を axum の既定エラーではなく固定メッセージで返すため、すべて Option で受ける
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQueryParams {
    pub space: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug)]
pub struct AvailabilityRequest {
    pub space: SpaceSelector,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    // 長さの不備は 400 ではなく「予約不可」の判定として返すので、結果のまま持つ
    pub duration: Result<BookingDuration, CalendarError>,
}

impl TryFrom<AvailabilityQueryParams> for AvailabilityRequest {
    type Error = AppError;

    fn try_from(value: AvailabilityQueryParams) -> AppResult<Self> {
        let AvailabilityQueryParams {
            space,
            date,
            time,
            duration,
        } = value;
        let (Some(space), Some(date), Some(time)) = (space, date, time) else {
            return Err(AppError::InvalidParameter(REQUIRED_PARAMETERS.into()));
        };
        let duration = match duration.as_deref().map(str::trim) {
            None | Some("") => BookingDuration::hours(1),
            Some(raw) => raw.parse::<BookingDuration>(),
        };
        Ok(Self {
            space: parse_space(&space)?,
            date: parse_date(&date)?,
            start_time: parse_time(&time)?,
            duration,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub requested_slots: Vec<String>,
    pub occupied_slots: Vec<String>,
    pub conflicting_slots: Vec<String>,
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<BlockedSlotResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlotResponse {
    pub slot: String,
    pub spaces: Vec<Space>,
}

fn labels(slots: Vec<TimeSlot>) -> Vec<String> {
    slots.into_iter().map(|s| s.to_string()).collect()
}

impl From<BlockedSlot> for BlockedSlotResponse {
    fn from(value: BlockedSlot) -> Self {
        let BlockedSlot { slot, spaces } = value;
        Self {
            slot: slot.to_string(),
            spaces,
        }
    }
}

impl From<AvailabilityVerdict> for AvailabilityResponse {
    fn from(value: AvailabilityVerdict) -> Self {
        let AvailabilityVerdict {
            available,
            requested_slots,
            occupied_slots,
            conflicting_slots,
            reason,
            blocked_by,
        } = value;
        Self {
            available,
            requested_slots: labels(requested_slots),
            occupied_slots: labels(occupied_slots),
            conflicting_slots: labels(conflicting_slots),
            reason,
            blocked_by: blocked_by.into_iter().map(BlockedSlotResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(space: Option<&str>, date: Option<&str>, time: Option<&str>) -> AvailabilityQueryParams {
        AvailabilityQueryParams {
            space: space.map(Into::into),
            date: date.map(Into::into),
            time: time.map(Into::into),
            duration: None,
        }
    }

    #[test]
    fn missing_parameters_use_the_fixed_message() {
        for p in [
            params(None, Some("2025-07-05"), Some("10:00")),
            params(Some("all"), None, Some("10:00")),
            params(Some("all"), Some("2025-07-05"), None),
        ] {
            let err = AvailabilityRequest::try_from(p).unwrap_err();
            assert_eq!(err.to_string(), REQUIRED_PARAMETERS);
        }
    }

    #[test]
    fn duration_defaults_to_one_hour_and_keeps_parse_failures() {
        let request =
            AvailabilityRequest::try_from(params(Some("cyclorama"), Some("2025-07-05"), Some("10:00")))
                .unwrap();
        assert_eq!(request.duration, BookingDuration::hours(1));

        let mut p = params(Some("cyclorama"), Some("2025-07-05"), Some("10:00"));
        p.duration = Some("1.5h".into());
        let request = AvailabilityRequest::try_from(p).unwrap();
        assert!(matches!(request.duration, Err(CalendarError::InvalidDuration(_))));
    }

    #[test]
    fn serializes_in_camel_case_without_empty_diagnostics() {
        let response = AvailabilityResponse::from(AvailabilityVerdict::rejected("the studio opens at 8:00"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["available"], false);
        assert_eq!(json["requestedSlots"], serde_json::json!([]));
        assert_eq!(json["reason"], "the studio opens at 8:00");
        assert!(json.get("blockedBy").is_none());
    }
}
