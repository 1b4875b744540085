use calamine::Data;

use crate::models::{DutRecord, RunLabel, SubValuePair};

use super::extract::{self, HomogeneityColor, SPOTMETER_KEYWORD};
use super::normalize;

// The measurement values sit at fixed positions in the report layout.
pub const SPOT_VALUE_COL: usize = 4;
pub const PAIR_FIRST_COL: usize = 4;
pub const PAIR_SECOND_COL: usize = 5;

fn numeric_cell(row: &[Data], col: usize) -> Option<f64> {
    match row.get(col)? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pull the spotmeter value and the sub-value pair for one color out of the
/// second-pass lookback rows. The first row carrying the spotmeter keyword
/// supplies the spotmeter value; the first row carrying the homogeneity
/// keyword supplies the pair. These may or may not be the same row.
fn optical_fields(
    rows: &[Vec<Data>],
    color: HomogeneityColor,
) -> (Option<f64>, Option<SubValuePair>) {
    let lookback = extract::lookback_rows(rows, color);

    let spotmeter = lookback
        .iter()
        .find(|row| extract::row_contains_keyword(row, SPOTMETER_KEYWORD))
        .and_then(|row| numeric_cell(row, SPOT_VALUE_COL));

    let values = lookback
        .iter()
        .find(|row| extract::row_contains_keyword(row, color.keyword()))
        .map(|row| SubValuePair {
            first: numeric_cell(row, PAIR_FIRST_COL),
            second: numeric_cell(row, PAIR_SECOND_COL),
        });

    (spotmeter, values)
}

/// Normalize a raw sheet and assemble the per-file record. Fields with no
/// matching marker data stay `None`; that is not an error.
pub fn extract_record(file_name: &str, run: RunLabel, rows: Vec<Vec<Data>>) -> DutRecord {
    let mut rows = normalize::remove_empty_rows(rows);
    normalize::canonicalize_labels(&mut rows);

    let (spotmeter_white, white_values) = optical_fields(&rows, HomogeneityColor::White);
    let (spotmeter_black, black_values) = optical_fields(&rows, HomogeneityColor::Black);

    DutRecord {
        file_name: file_name.to_string(),
        run,
        spotmeter_white,
        white_values,
        spotmeter_black,
        black_values,
    }
}
