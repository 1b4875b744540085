use calamine::Data;

use super::extract::{BLACK_HOMOGENEITY, WHITE_HOMOGENEITY};

// Label spellings seen in older report templates.
const WHITE_VARIANT: &str = "White Homogeneity";
const BLACK_VARIANT: &str = "Black Homogeneity";

/// Drop rows where every cell is empty. Presence is what matters, not value.
pub fn remove_empty_rows(rows: Vec<Vec<Data>>) -> Vec<Vec<Data>> {
    rows.into_iter()
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .collect()
}

/// Rewrite the spaced label variants into the single-token markers, in
/// place. Case-sensitive substring replacement, so "Initial White
/// Homogeneity Test" becomes "Initial WhiteHomogeneity Test".
pub fn canonicalize_labels(rows: &mut [Vec<Data>]) {
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            if let Data::String(text) = cell {
                if text.contains(WHITE_VARIANT) {
                    *text = text.replace(WHITE_VARIANT, WHITE_HOMOGENEITY);
                }
                if text.contains(BLACK_VARIANT) {
                    *text = text.replace(BLACK_VARIANT, BLACK_HOMOGENEITY);
                }
            }
        }
    }
}
