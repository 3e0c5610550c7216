//! Common types and numeric helpers used across the platform

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Wire format for calendar dates (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Quantities closer to zero than this are treated as exactly zero (1e-4 kg)
pub const QUANTITY_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `part / whole * 100`, or zero when `whole` is zero
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

/// Relative change from `previous` to `current` in percent, zero when there
/// is no previous value to compare against
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    percent_of(current - previous, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn epsilon_is_one_ten_thousandth() {
        assert_eq!(QUANTITY_EPSILON, dec!(0.0001));
    }

    #[test]
    fn percent_of_guards_zero_denominator() {
        assert_eq!(percent_of(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(50), dec!(200)), dec!(25));
    }

    #[test]
    fn percent_change_handles_decrease() {
        assert_eq!(percent_change(dec!(90), dec!(100)), dec!(-10));
        assert_eq!(percent_change(dec!(90), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn date_round_trip_and_rejects_garbage() {
        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(format_date(date), "2024-03-09");
        assert!(parse_date("09/03/2024").is_err());
    }
}
