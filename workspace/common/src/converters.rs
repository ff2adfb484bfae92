use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a user-entered money amount to two decimal places.
///
/// Midpoints round away from zero, so `250.555` becomes `250.56`.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true when `date` falls in the same calendar month as `ref_date`.
pub fn same_month(date: NaiveDate, ref_date: NaiveDate) -> bool {
    date.year() == ref_date.year() && date.month() == ref_date.month()
}

/// Prorates a yearly amount into its monthly share.
pub fn yearly_to_monthly(amount: Decimal) -> Decimal {
    amount / Decimal::from(12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_amount_midpoint_goes_up() {
        let rounded = round_amount(Decimal::new(250555, 3)); // 250.555
        assert_eq!(rounded, Decimal::new(25056, 2)); // 250.56
    }

    #[test]
    fn test_round_amount_leaves_rounded_values_alone() {
        let amount = Decimal::new(199999, 2); // 1999.99
        assert_eq!(round_amount(amount), amount);
    }

    #[test]
    fn test_round_amount_negative_midpoint_goes_away_from_zero() {
        let rounded = round_amount(Decimal::new(-10005, 3)); // -10.005
        assert_eq!(rounded, Decimal::new(-1001, 2)); // -10.01
    }

    #[test]
    fn test_same_month_within_month() {
        let ref_date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(same_month(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ref_date
        ));
        assert!(same_month(
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            ref_date
        ));
    }

    #[test]
    fn test_same_month_rejects_neighbouring_months() {
        let ref_date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(!same_month(
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            ref_date
        ));
        assert!(!same_month(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            ref_date
        ));
    }

    #[test]
    fn test_same_month_rejects_same_month_of_other_year() {
        let ref_date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(!same_month(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            ref_date
        ));
    }

    #[test]
    fn test_yearly_to_monthly() {
        assert_eq!(
            yearly_to_monthly(Decimal::new(120000, 2)), // 1200.00
            Decimal::new(10000, 2)                      // 100.00
        );
    }
}
