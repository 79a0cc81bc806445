//! Plain-text rendering for the command-line front end.

use chrono::NaiveDate;
use common::{PredictionOutcome, PredictionRecord, ShelfLifeTable};

pub const EMPTY_HISTORY: &str = "No prediction history yet.";

/// `Mon Jan 08 2024`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn status_label(is_expired: bool) -> &'static str {
    if is_expired {
        "Expired"
    } else {
        "Safe"
    }
}

pub fn render_outcome(outcome: &PredictionOutcome) -> String {
    format!(
        "Expiry Date: {} ({})",
        display_date(outcome.expiry_date),
        status_label(outcome.is_expired)
    )
}

/// History as an aligned table, newest first.
pub fn render_history(records: &[PredictionRecord]) -> String {
    if records.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    let header = ["Id", "Product", "Manufactured", "Expires", "Status"];
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                capitalize(&r.product),
                display_date(r.mfg_date),
                display_date(r.expiry_date),
                r.status_label().to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Known products with their shelf life, plus the latest accepted
/// manufacture date.
pub fn render_products(table: &ShelfLifeTable, today: NaiveDate) -> String {
    let width = table
        .iter()
        .map(|(p, _)| capitalize(p).chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (product, days) in table.iter() {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{:<width$}  {} {}\n", capitalize(product), days, unit));
    }
    out.push_str(&format!(
        "Manufacture date must be on or before {}",
        today.format("%Y-%m-%d")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(date(2024, 1, 8)), "Mon Jan 08 2024");
        assert_eq!(display_date(date(2024, 11, 28)), "Thu Nov 28 2024");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("milk"), "Milk");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ñame"), "Ñame");
    }

    #[test]
    fn test_render_outcome() {
        let outcome = PredictionOutcome {
            product: "milk".into(),
            mfg_date: date(2024, 1, 1),
            expiry_date: date(2024, 1, 8),
            is_expired: true,
        };
        assert_eq!(render_outcome(&outcome), "Expiry Date: Mon Jan 08 2024 (Expired)");
    }

    #[test]
    fn test_render_empty_history() {
        assert_eq!(render_history(&[]), EMPTY_HISTORY);
    }

    #[test]
    fn test_render_history_rows() {
        let records = vec![
            PredictionRecord {
                id: 2,
                product: "biscuit".into(),
                mfg_date: date(2024, 6, 1),
                expiry_date: date(2024, 11, 28),
                is_expired: false,
            },
            PredictionRecord {
                id: 1,
                product: "milk".into(),
                mfg_date: date(2024, 1, 1),
                expiry_date: date(2024, 1, 8),
                is_expired: true,
            },
        ];

        let out = render_history(&records);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Id  Product"));
        assert!(lines[1].starts_with("2   Biscuit  Sat Jun 01 2024"));
        assert!(lines[1].ends_with("Safe"));
        assert!(lines[2].starts_with("1   Milk"));
        assert!(lines[2].ends_with("Expired"));
    }

    #[test]
    fn test_render_products_aligns_non_ascii() {
        let table = ShelfLifeTable::new([("ñame", 3u32), ("tea", 5)]).unwrap();
        let out = render_products(&table, date(2024, 1, 10));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Tea   5 days");
        assert_eq!(lines[1], "Ñame  3 days");
    }

    #[test]
    fn test_render_products() {
        let table = ShelfLifeTable::new([("milk", 7u32), ("salt", 1)]).unwrap();
        let out = render_products(&table, date(2024, 1, 10));
        assert_eq!(
            out,
            "Milk  7 days\nSalt  1 day\nManufacture date must be on or before 2024-01-10"
        );
    }
}
