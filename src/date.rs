use chrono::{Datelike, Local, NaiveDate};

use crate::error::{Result, VisitError};

/// Format used in the visits file
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Format shown to users and written to exports
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parse a date typed by the user, as `YYYY-MM-DD` or `DD/MM/YYYY`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    [STORAGE_FORMAT, DISPLAY_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| VisitError::InvalidDate(input.to_string()))
}

pub fn display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("2024-03-01").unwrap(), expected);
        assert_eq!(parse_date(" 01/03/2024 ").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("March 1st").unwrap_err();
        assert!(matches!(err, VisitError::InvalidDate(s) if s == "March 1st"));
    }

    #[test]
    fn display_is_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(display(date), "01/03/2024");
        assert_eq!(month_start(NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()), date);
    }
}
