//! Domain types shared across the predictor.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ── Shelf-life table ──────────────────────────────────────────────────

/// Built-in shelf lives, in days.
pub const DEFAULT_SHELF_LIFE: &[(&str, u32)] = &[
    ("apple", 60),
    ("milk", 7),
    ("biscuit", 180),
    ("chocolate", 365),
    ("bread", 5),
    ("tomato", 10),
    ("rice", 365),
    ("cheese", 14),
    ("yogurt", 10),
    ("carrot", 14),
    ("banana", 7),
    ("onion", 30),
    ("potato", 90),
];

/// Trim and lowercase a product name into its table key.
pub fn normalize_product(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Static mapping from product key to shelf life in days.
///
/// Keys are always stored normalized and every entry is at least one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfLifeTable {
    days: BTreeMap<String, u32>,
}

impl ShelfLifeTable {
    /// Build a table, normalizing keys and rejecting empty keys, zero-day
    /// entries and keys that collide after normalization.
    pub fn new<K, I>(entries: I) -> Result<Self, Error>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, u32)>,
    {
        let mut days = BTreeMap::new();
        let mut issues: Vec<String> = Vec::new();

        for (raw_key, shelf_days) in entries {
            let key = normalize_product(raw_key.as_ref());
            if key.is_empty() {
                issues.push("shelf_life contains an empty product name".into());
                continue;
            }
            if shelf_days == 0 {
                issues.push(format!("shelf_life.{key} must be > 0"));
                continue;
            }
            if days.insert(key.clone(), shelf_days).is_some() {
                issues.push(format!("shelf_life.{key} is defined more than once"));
            }
        }

        if issues.is_empty() {
            Ok(Self { days })
        } else {
            Err(Error::Config(format!(
                "Invalid shelf-life table:\n - {}",
                issues.join("\n - ")
            )))
        }
    }

    /// Shelf life for an already-normalized product key.
    pub fn get(&self, product: &str) -> Option<u32> {
        self.days.get(product).copied()
    }

    /// Entries in product-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.days.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for ShelfLifeTable {
    fn default() -> Self {
        Self {
            days: DEFAULT_SHELF_LIFE
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

// ── Predictions ───────────────────────────────────────────────────────

/// Successful result of an expiry prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionOutcome {
    pub product: String,
    pub mfg_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// Status as of the day the prediction was made.
    pub is_expired: bool,
}

/// A prediction stored in the history. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: u64,
    pub product: String,
    #[serde(with = "iso_date")]
    pub mfg_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub expiry_date: NaiveDate,
    pub is_expired: bool,
}

impl PredictionRecord {
    pub fn from_outcome(id: u64, outcome: PredictionOutcome) -> Self {
        Self {
            id,
            product: outcome.product,
            mfg_date: outcome.mfg_date,
            expiry_date: outcome.expiry_date,
            is_expired: outcome.is_expired,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_expired {
            "Expired"
        } else {
            "Safe"
        }
    }
}

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 date-time.
///
/// A date-time keeps the calendar date written in its own offset, so
/// `2024-01-10T23:00:00-05:00` is 2024-01-10.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Like [`parse_calendar_date`], but date-times are reduced to their UTC
/// calendar date. Stored records are always written at UTC midnight.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Serializes a `NaiveDate` as a UTC-midnight ISO-8601 date-time with
/// millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub mod iso_date {
    use chrono::{NaiveDate, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn to_iso(date: &NaiveDate) -> String {
        date.and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_iso(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_stored_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_table_normalizes_keys() {
        let table = ShelfLifeTable::new([("  Milk ", 7u32), ("BREAD", 5)]).unwrap();
        assert_eq!(table.get("milk"), Some(7));
        assert_eq!(table.get("bread"), Some(5));
        assert_eq!(table.get("Milk"), None);
    }

    #[test]
    fn test_table_rejects_zero_and_duplicates() {
        let err = ShelfLifeTable::new([("milk", 0u32), ("tea", 3), ("TEA", 4), (" ", 2)])
            .unwrap_err()
            .to_string();
        assert!(err.contains("shelf_life.milk must be > 0"));
        assert!(err.contains("shelf_life.tea is defined more than once"));
        assert!(err.contains("empty product name"));
    }

    #[test]
    fn test_default_table_matches_builtin_list() {
        let table = ShelfLifeTable::default();
        assert_eq!(table.len(), DEFAULT_SHELF_LIFE.len());
        assert_eq!(table.get("biscuit"), Some(180));
        assert_eq!(table.get("potato"), Some(90));
    }

    #[test]
    fn test_record_wire_format() {
        let record = PredictionRecord {
            id: 1_704_067_200_000,
            product: "milk".into(),
            mfg_date: date(2024, 1, 1),
            expiry_date: date(2024, 1, 8),
            is_expired: true,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1_704_067_200_000u64,
                "product": "milk",
                "mfgDate": "2024-01-01T00:00:00.000Z",
                "expiryDate": "2024-01-08T00:00:00.000Z",
                "isExpired": true,
            })
        );
    }

    #[test]
    fn test_record_accepts_bare_dates_and_offsets() {
        let raw = r#"{"id":7,"product":"rice","mfgDate":"2024-03-01",
            "expiryDate":"2025-03-01T02:00:00+02:00","isExpired":false}"#;
        let record: PredictionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.mfg_date, date(2024, 3, 1));
        // 02:00 at +02:00 is midnight UTC.
        assert_eq!(record.expiry_date, date(2025, 3, 1));
    }

    #[test]
    fn test_parse_calendar_date_rejects_garbage() {
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date(" 2024-02-29 "), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_parse_calendar_date_keeps_written_date() {
        assert_eq!(
            parse_calendar_date("2024-01-10T23:00:00-05:00"),
            Some(date(2024, 1, 10))
        );
        assert_eq!(
            parse_calendar_date("2024-01-10T01:00:00+09:00"),
            Some(date(2024, 1, 10))
        );
        // Stored values still resolve to their UTC day.
        assert_eq!(
            parse_stored_date("2024-01-10T23:00:00-05:00"),
            Some(date(2024, 1, 11))
        );
    }
}
