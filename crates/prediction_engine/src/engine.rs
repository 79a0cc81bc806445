//! Expiry prediction.

use chrono::{Days, NaiveDate};
use common::{normalize_product, parse_calendar_date, PredictionOutcome, ShelfLifeTable, ValidationError};
use tracing::debug;

/// Calendar-day addition. `None` only when the result leaves chrono's range.
pub fn expiry_date(mfg_date: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    mfg_date.checked_add_days(Days::new(u64::from(shelf_life_days)))
}

/// Predict the expiry date of `product_raw` manufactured on `mfg_date_raw`.
///
/// Checks run in a fixed order: missing input, unknown product, unparseable
/// date, future date. A product that expires exactly on `today` is still
/// considered safe.
pub fn predict(
    product_raw: &str,
    mfg_date_raw: Option<&str>,
    table: &ShelfLifeTable,
    today: NaiveDate,
) -> Result<PredictionOutcome, ValidationError> {
    let product = normalize_product(product_raw);
    let mfg_date_raw = mfg_date_raw.map(str::trim).unwrap_or_default();
    if product.is_empty() || mfg_date_raw.is_empty() {
        return Err(ValidationError::MissingInput);
    }

    let shelf_life_days = table
        .get(&product)
        .ok_or_else(|| ValidationError::UnknownProduct(product.clone()))?;

    let mfg_date = parse_calendar_date(mfg_date_raw)
        .ok_or_else(|| ValidationError::InvalidDate(mfg_date_raw.to_string()))?;

    if mfg_date > today {
        return Err(ValidationError::FutureDate { mfg_date, today });
    }

    let expiry_date = expiry_date(mfg_date, shelf_life_days)
        .ok_or_else(|| ValidationError::InvalidDate(mfg_date_raw.to_string()))?;
    let is_expired = expiry_date < today;

    debug!(
        "{}: made {} + {}d = {} ({})",
        product,
        mfg_date,
        shelf_life_days,
        expiry_date,
        if is_expired { "expired" } else { "safe" }
    );

    Ok(PredictionOutcome {
        product,
        mfg_date,
        expiry_date,
        is_expired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(entries: &[(&str, u32)]) -> ShelfLifeTable {
        ShelfLifeTable::new(entries.iter().copied()).unwrap()
    }

    #[test]
    fn test_milk_expired() {
        let out = predict("milk", Some("2024-01-01"), &table(&[("milk", 7)]), date(2024, 1, 10))
            .unwrap();
        assert_eq!(out.product, "milk");
        assert_eq!(out.mfg_date, date(2024, 1, 1));
        assert_eq!(out.expiry_date, date(2024, 1, 8));
        assert!(out.is_expired);
    }

    #[test]
    fn test_biscuit_safe() {
        let out = predict(
            "biscuit",
            Some("2024-06-01"),
            &table(&[("biscuit", 180)]),
            date(2024, 6, 2),
        )
        .unwrap();
        assert_eq!(out.expiry_date, date(2024, 11, 28));
        assert!(!out.is_expired);
    }

    #[test]
    fn test_month_and_year_rollover() {
        assert_eq!(expiry_date(date(2024, 3, 1), 365), Some(date(2025, 3, 1)));
        assert_eq!(expiry_date(date(2022, 11, 20), 180), Some(date(2023, 5, 19)));
        assert_eq!(expiry_date(date(2023, 12, 30), 5), Some(date(2024, 1, 4)));
        // Crosses 2024-02-29.
        assert_eq!(expiry_date(date(2024, 2, 25), 5), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_input_is_normalized() {
        let out = predict(
            "  MiLk\t",
            Some(" 2024-01-01 "),
            &table(&[("milk", 7)]),
            date(2024, 1, 2),
        )
        .unwrap();
        assert_eq!(out.product, "milk");
        assert!(!out.is_expired);
    }

    #[test]
    fn test_missing_input() {
        let t = table(&[("milk", 7)]);
        let today = date(2024, 1, 10);
        assert_eq!(predict("   ", Some("2024-01-01"), &t, today), Err(ValidationError::MissingInput));
        assert_eq!(predict("milk", None, &t, today), Err(ValidationError::MissingInput));
        assert_eq!(predict("milk", Some(""), &t, today), Err(ValidationError::MissingInput));
    }

    #[test]
    fn test_unknown_product_regardless_of_date() {
        let t = table(&[("milk", 7)]);
        let today = date(2024, 1, 10);
        for raw in ["2024-01-01", "2099-01-01", "not-a-date"] {
            assert_eq!(
                predict("caviar", Some(raw), &t, today),
                Err(ValidationError::UnknownProduct("caviar".into())),
                "date {raw}"
            );
        }
    }

    #[test]
    fn test_invalid_date() {
        let t = table(&[("milk", 7)]);
        assert_eq!(
            predict("milk", Some("2024-13-01"), &t, date(2024, 1, 10)),
            Err(ValidationError::InvalidDate("2024-13-01".into()))
        );
    }

    #[test]
    fn test_future_date() {
        let t = table(&[("milk", 7)]);
        assert_eq!(
            predict("milk", Some("2024-01-11"), &t, date(2024, 1, 10)),
            Err(ValidationError::FutureDate {
                mfg_date: date(2024, 1, 11),
                today: date(2024, 1, 10),
            })
        );
        // Made today is fine.
        assert!(predict("milk", Some("2024-01-10"), &t, date(2024, 1, 10)).is_ok());
    }

    #[test]
    fn test_expiring_today_is_not_expired() {
        let t = table(&[("milk", 7)]);
        let out = predict("milk", Some("2024-01-01"), &t, date(2024, 1, 8)).unwrap();
        assert_eq!(out.expiry_date, date(2024, 1, 8));
        assert!(!out.is_expired);

        let out = predict("milk", Some("2024-01-01"), &t, date(2024, 1, 9)).unwrap();
        assert!(out.is_expired);
    }

    #[test]
    fn test_offset_datetime_uses_written_date() {
        let t = table(&[("milk", 7)]);
        let out = predict("milk", Some("2024-01-10T23:00:00-05:00"), &t, date(2024, 1, 10))
            .unwrap();
        assert_eq!(out.mfg_date, date(2024, 1, 10));
        assert_eq!(out.expiry_date, date(2024, 1, 17));
    }

    #[test]
    fn test_rfc3339_utc_input() {
        let t = table(&[("bread", 5)]);
        let out = predict("bread", Some("2024-01-01T00:00:00.000Z"), &t, date(2024, 1, 3)).unwrap();
        assert_eq!(out.mfg_date, date(2024, 1, 1));
        assert_eq!(out.expiry_date, date(2024, 1, 6));
    }
}
