//! End-to-end pipeline properties: normalization, validation, and feature
//! synthesis.

use chrono::NaiveDate;
use demandcast::ingest::{RawCell, RawTable};
use demandcast::pipeline::{process, CANONICAL_COLUMNS};

const HEADERS: [&str; 6] = [
    "Data",
    "Produto",
    "Categoria",
    "Região",
    "Quantidade",
    "Preço Unitário",
];

fn table(rows: Vec<Vec<RawCell>>) -> RawTable {
    RawTable {
        headers: HEADERS.iter().map(|s| s.to_string()).collect(),
        rows,
    }
}

fn row(date: &str, product: &str, region: &str, quantity: f64) -> Vec<RawCell> {
    vec![
        RawCell::Date(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        RawCell::Text(product.into()),
        RawCell::Text("Bebidas".into()),
        RawCell::Text(region.into()),
        RawCell::Number(quantity),
        RawCell::Number(7.25),
    ]
}

#[test]
fn categorical_fields_are_lowercase_without_padding() {
    let raw = table(vec![row("2024-04-01", "  Café Torrado  ", " SUL ", 5.0)]);
    let records = process(&raw).unwrap();

    assert_eq!(records[0].product, "café torrado");
    assert_eq!(records[0].region, "sul");
    assert_eq!(records[0].category, "bebidas");
}

#[test]
fn row_count_never_increases() {
    let mut bad_quantity = row("2024-04-02", "café", "sul", 0.0);
    bad_quantity[4] = RawCell::Text("not a number".into());
    let mut bad_date = row("2024-04-03", "café", "sul", 3.0);
    bad_date[0] = RawCell::Text("??".into());

    let raw = table(vec![
        row("2024-04-01", "café", "sul", 5.0),
        bad_quantity,
        bad_date,
    ]);

    let records = process(&raw).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn earliest_row_has_zero_offset_and_trend() {
    let raw = table(vec![
        row("2024-04-05", "café", "sul", 20.0),
        row("2024-04-01", "café", "sul", 10.0),
    ]);

    let records = process(&raw).unwrap();
    assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    assert_eq!(records[0].days_since_start, 0);
    assert_eq!(records[0].local_trend, 0.0);
}

#[test]
fn consecutive_dates_ten_then_fifteen_give_trend_five() {
    let raw = table(vec![
        row("2024-04-01", "café", "sul", 10.0),
        row("2024-04-02", "café", "sul", 15.0),
    ]);

    let records = process(&raw).unwrap();
    assert_eq!(records[1].local_trend, 5.0);
    assert_eq!(records[1].days_since_start, 1);
}

#[test]
fn weekend_flag_uses_monday_zero_convention() {
    let raw = table(vec![
        row("2024-04-05", "café", "sul", 1.0), // Friday
        row("2024-04-06", "café", "sul", 1.0), // Saturday
        row("2024-04-07", "café", "sul", 1.0), // Sunday
    ]);

    let records = process(&raw).unwrap();
    assert!(!records[0].weekend);
    assert!(records[1].weekend);
    assert!(records[2].weekend);
    assert_eq!(records[1].weekday, "Saturday");
}

#[test]
fn canonical_columns_are_snake_case() {
    for column in CANONICAL_COLUMNS {
        assert_eq!(column, column.to_lowercase());
        assert!(!column.contains(' '));
    }
}

#[test]
fn empty_table_is_an_empty_batch() {
    assert!(process(&RawTable::default()).unwrap().is_empty());
}
