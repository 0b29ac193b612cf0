pub mod availability;
pub mod calendar;
pub mod reservation;

use chrono::{NaiveDate, NaiveTime};
use kernel::model::space::SpaceSelector;
use shared::error::{AppError, AppResult};

// クエリ文字列・リクエストボディの値はここで一度だけドメイン型に変換する

pub(crate) fn parse_space(raw: &str) -> AppResult<SpaceSelector> {
    raw.parse::<SpaceSelector>()
        .map_err(|e| AppError::InvalidParameter(e.to_string()))
}

pub(crate) fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::InvalidParameter(format!("date must be formatted as YYYY-MM-DD: {raw}"))
    })
}

pub(crate) fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidParameter(format!("time must be formatted as HH:MM: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boundary_values() {
        assert_eq!(parse_time("09:00").unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(parse_time("14:00:00").unwrap(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert!(parse_time("25:00").is_err());
        assert_eq!(
            parse_date("2025-07-05").unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 5).unwrap()
        );
        assert!(parse_date("05/07/2025").is_err());
        assert_eq!(parse_space("all").unwrap(), SpaceSelector::All);
        assert!(matches!(parse_space("attic"), Err(AppError::InvalidParameter(_))));
    }
}
