use calamine::Data;

pub const SPOTMETER_KEYWORD: &str = "Spotmeter #005";
pub const WHITE_HOMOGENEITY: &str = "WhiteHomogeneity";
pub const BLACK_HOMOGENEITY: &str = "BlackHomogeneity";

pub const MARKER_KEYWORDS: [&str; 3] = [SPOTMETER_KEYWORD, WHITE_HOMOGENEITY, BLACK_HOMOGENEITY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomogeneityColor {
    White,
    Black,
}

impl HomogeneityColor {
    pub fn keyword(self) -> &'static str {
        match self {
            HomogeneityColor::White => WHITE_HOMOGENEITY,
            HomogeneityColor::Black => BLACK_HOMOGENEITY,
        }
    }
}

/// Case-insensitive exact match against any cell value of the row.
/// Substring occurrences do not count; the normalizer is what collapses the
/// spaced label variants into matchable tokens.
pub fn row_contains_keyword(row: &[Data], keyword: &str) -> bool {
    row.iter()
        .any(|cell| cell.to_string().eq_ignore_ascii_case(keyword))
}

fn row_contains_any_keyword(row: &[Data]) -> bool {
    MARKER_KEYWORDS
        .iter()
        .any(|keyword| row_contains_keyword(row, keyword))
}

#[derive(Debug)]
pub struct MarkerScan {
    /// Rows containing any of the marker keywords, in row order.
    pub matches: Vec<Vec<Data>>,
    /// Predecessors of the rows matching the requested homogeneity keyword,
    /// in match order. A match at the first scanned row captures nothing.
    pub lookback: Vec<Vec<Data>>,
}

/// One scan over a row sequence. The tracked predecessor is the previous
/// row of the scanned sequence, whether or not that row matched anything.
pub fn scan_markers(rows: &[Vec<Data>], color: HomogeneityColor) -> MarkerScan {
    let mut matches = Vec::new();
    let mut lookback = Vec::new();
    let mut previous: Option<&Vec<Data>> = None;

    for row in rows {
        if row_contains_keyword(row, color.keyword()) {
            if let Some(prev) = previous {
                lookback.push(prev.clone());
            }
        }

        if row_contains_any_keyword(row) {
            matches.push(row.clone());
        }

        previous = Some(row);
    }

    MarkerScan { matches, lookback }
}

/// The lookback rows the record builder reads from.
///
/// The scan runs twice: the second pass walks the first pass's keyword rows,
/// so its lookback rows come from positions within that filtered sequence.
/// On real reports this is what puts the spotmeter value row directly before
/// its marker even when unrelated rows sit between them in the sheet. The
/// first pass's lookback set is discarded.
pub fn lookback_rows(rows: &[Vec<Data>], color: HomogeneityColor) -> Vec<Vec<Data>> {
    let first_pass = scan_markers(rows, color);
    scan_markers(&first_pass.matches, color).lookback
}
