//! Normalization and validation of raw tables.
//!
//! Source spreadsheets use Portuguese headers (`Data`, `Produto`, ...);
//! canonical English snake_case names are also accepted. String fields are
//! trimmed and lower-cased, dates and numerics are coerced with a missing
//! marker on failure, and any row missing a core field is dropped.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::ingest::{RawCell, RawTable};

/// Canonical column names of the validated table, in output order.
pub const CANONICAL_COLUMNS: [&str; 6] = [
    "date",
    "product",
    "category",
    "region",
    "quantity",
    "unit_price",
];

/// Accepted source spellings per canonical column, lower-cased. Header
/// matching is case-insensitive and ignores surrounding whitespace.
const COLUMN_ALIASES: [(&str, &[&str]); 6] = [
    ("date", &["data", "date"]),
    ("product", &["produto", "product"]),
    ("category", &["categoria", "category"]),
    ("region", &["região", "regiao", "region"]),
    ("quantity", &["quantidade", "quantity"]),
    (
        "unit_price",
        &["preço unitário", "preco unitario", "unit price", "unit_price"],
    ),
];

/// One validated row: all core fields present and coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub product: String,
    pub category: String,
    pub region: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: f64,
}

struct ColumnMap {
    date: usize,
    product: usize,
    category: usize,
    region: usize,
    quantity: usize,
    unit_price: usize,
}

impl ColumnMap {
    fn resolve(table: &RawTable) -> Result<Self> {
        let headers: Vec<String> = table
            .headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let find = |canonical: &str| -> Result<usize> {
            let aliases = COLUMN_ALIASES
                .iter()
                .find(|(name, _)| *name == canonical)
                .map(|(_, aliases)| *aliases)
                .unwrap_or_default();
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias))
                .ok_or_else(|| {
                    IngestError::MissingColumn {
                        column: canonical.to_string(),
                    }
                    .into()
                })
        };

        Ok(Self {
            date: find("date")?,
            product: find("product")?,
            category: find("category")?,
            region: find("region")?,
            quantity: find("quantity")?,
            unit_price: find("unit_price")?,
        })
    }
}

/// Normalize and validate a raw table into clean rows.
///
/// An entirely empty table yields an empty vec. A column composed solely of
/// unparsable values drops every row.
///
/// # Errors
/// Returns [`IngestError::MissingColumn`] when a non-empty table lacks a
/// required column.
pub fn normalize(table: &RawTable) -> Result<Vec<CleanRow>> {
    if table.headers.is_empty() && table.rows.is_empty() {
        return Ok(Vec::new());
    }

    let columns = ColumnMap::resolve(table)?;
    let total = table.rows.len();
    let mut clean = Vec::with_capacity(total);

    for row in &table.rows {
        let candidate = (
            coerce_text(row.get(columns.product)),
            coerce_text(row.get(columns.category)),
            coerce_text(row.get(columns.region)),
            coerce_date(row.get(columns.date)),
            coerce_number(row.get(columns.quantity)),
            coerce_number(row.get(columns.unit_price)),
        );

        if let (Some(product), Some(category), Some(region), Some(date), Some(quantity), Some(unit_price)) =
            candidate
        {
            clean.push(CleanRow {
                product,
                category,
                region,
                date,
                quantity,
                unit_price,
            });
        }
    }

    let dropped = total - clean.len();
    if dropped > 0 {
        debug!(total, dropped, "dropped rows failing coercion");
    }

    Ok(clean)
}

/// Cast to text, trim, and lower-case. Empty cells and cells that trim to
/// nothing are missing.
fn coerce_text(cell: Option<&RawCell>) -> Option<String> {
    let text = match cell? {
        RawCell::Text(s) => s.trim().to_lowercase(),
        RawCell::Number(n) => n.to_string(),
        RawCell::Date(d) => d.to_string(),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Empty => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse a calendar date; unparsable values become a missing marker.
fn coerce_date(cell: Option<&RawCell>) -> Option<NaiveDate> {
    match cell? {
        RawCell::Date(d) => Some(*d),
        RawCell::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%Y-%m-%d %H:%M:%S"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Parse to floating point; unparsable values become a missing marker.
fn coerce_number(cell: Option<&RawCell>) -> Option<f64> {
    match cell? {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(headers: &[&str], rows: Vec<Vec<RawCell>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    fn valid_row() -> Vec<RawCell> {
        vec![
            RawCell::Text("2024-05-10".into()),
            RawCell::Text("  Cerveja Lager  ".into()),
            RawCell::Text("Bebidas".into()),
            RawCell::Text("Sul".into()),
            RawCell::Text("42".into()),
            RawCell::Number(8.5),
        ]
    }

    const HEADERS: [&str; 6] = [
        "Data",
        "Produto",
        "Categoria",
        "Região",
        "Quantidade",
        "Preço Unitário",
    ];

    #[test]
    fn strings_are_trimmed_and_lowercased() {
        let table = make_table(&HEADERS, vec![valid_row()]);
        let rows = normalize(&table).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "cerveja lager");
        assert_eq!(rows[0].category, "bebidas");
        assert_eq!(rows[0].region, "sul");
    }

    #[test]
    fn textual_numbers_and_dates_are_coerced() {
        let table = make_table(&HEADERS, vec![valid_row()]);
        let rows = normalize(&table).unwrap();

        assert_eq!(rows[0].quantity, 42.0);
        assert_eq!(rows[0].unit_price, 8.5);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }

    #[test]
    fn unparsable_date_drops_the_row() {
        let mut row = valid_row();
        row[0] = RawCell::Text("sometime in may".into());
        let table = make_table(&HEADERS, vec![row, valid_row()]);

        let rows = normalize(&table).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn unparsable_quantity_drops_the_row() {
        let mut row = valid_row();
        row[4] = RawCell::Text("muitos".into());
        let table = make_table(&HEADERS, vec![row]);

        assert!(normalize(&table).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_product_is_missing() {
        let mut row = valid_row();
        row[1] = RawCell::Text("   ".into());
        let table = make_table(&HEADERS, vec![row]);

        assert!(normalize(&table).unwrap().is_empty());
    }

    #[test]
    fn fully_unparsable_column_empties_the_table() {
        let rows = (0..5)
            .map(|_| {
                let mut row = valid_row();
                row[5] = RawCell::Text("n/a".into());
                row
            })
            .collect();
        let table = make_table(&HEADERS, rows);

        assert!(normalize(&table).unwrap().is_empty());
    }

    #[test]
    fn ragged_row_is_dropped() {
        let mut row = valid_row();
        row.truncate(4);
        let table = make_table(&HEADERS, vec![row, valid_row()]);

        assert_eq!(normalize(&table).unwrap().len(), 1);
    }

    #[test]
    fn canonical_english_headers_are_accepted() {
        let table = make_table(
            &["date", "product", "category", "region", "quantity", "unit_price"],
            vec![valid_row()],
        );
        assert_eq!(normalize(&table).unwrap().len(), 1);
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let table = make_table(
            &["Date", " PRODUTO ", "Category", "Region", "Quantity", "Unit Price"],
            vec![valid_row()],
        );
        assert_eq!(normalize(&table).unwrap().len(), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = make_table(&["Data", "Produto"], vec![vec![]]);
        assert!(normalize(&table).is_err());
    }

    #[test]
    fn empty_table_is_not_an_error() {
        assert!(normalize(&RawTable::default()).unwrap().is_empty());
    }

    #[test]
    fn dd_mm_yyyy_dates_parse() {
        assert_eq!(
            parse_date_text("10/05/2024"),
            NaiveDate::from_ymd_opt(2024, 5, 10)
        );
    }
}
