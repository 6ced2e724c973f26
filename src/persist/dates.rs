//! The `DD-MM-YYYY` literal date format used by the flat record files.

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%d-%m-%Y";

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_first_dates() {
        let date = parse_date("01-03-2025").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"));
    }

    #[test]
    fn format_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date");
        assert_eq!(parse_date(&format_date(date)).expect("round trip"), date);
    }

    #[test]
    fn rejects_iso_ordering() {
        assert!(parse_date("2025-03-01").is_err());
        assert!(parse_date("31-13-2025").is_err());
    }
}
