use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Which measurement run a spreadsheet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunLabel {
    Initial,
    Final,
}

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLabel::Initial => write!(f, "Initial"),
            RunLabel::Final => write!(f, "Final"),
        }
    }
}

/// One uploaded spreadsheet, as received from the ingestion surface.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
}

/// The two sub-measurements captured next to a homogeneity marker.
///
/// A member is `None` when the source cell was missing or not numeric; the
/// deviation engine coerces that to 0 when it computes ratios. The pair as a
/// whole is absent when no source row was found at all, which is a different
/// condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubValuePair {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl SubValuePair {
    /// first/second, with missing members coerced to 0 and a zero
    /// denominator treated as ratio 0 rather than a failure.
    pub fn ratio(&self) -> f64 {
        let first = self.first.unwrap_or(0.0);
        let second = self.second.unwrap_or(0.0);
        if second == 0.0 {
            0.0
        } else {
            first / second
        }
    }
}

/// Readings extracted from one spreadsheet file. Immutable once built and
/// scoped to a single batch.
#[derive(Debug, Clone, Serialize)]
pub struct DutRecord {
    pub file_name: String,
    pub run: RunLabel,
    pub spotmeter_white: Option<f64>,
    pub white_values: Option<SubValuePair>,
    pub spotmeter_black: Option<f64>,
    pub black_values: Option<SubValuePair>,
}

/// A spreadsheet that could not be read. The batch continues without it.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub run: RunLabel,
    pub error: String,
}

/// Percentage change between an initial and a final measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    Percent(f64),
    /// Division by zero or 0/0. Reported per record instead of failing the
    /// batch, and never collapsed to a plain 0.
    NonFinite,
}

impl Deviation {
    /// (final/initial * 100) - 100
    pub fn from_change(initial: f64, final_value: f64) -> Self {
        let percent = (final_value / initial) * 100.0 - 100.0;
        if percent.is_finite() {
            Deviation::Percent(percent)
        } else {
            Deviation::NonFinite
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationCategory {
    LuminanceWhite,
    LuminanceBlack,
    Contrast,
    HomogeneityWhite,
    HomogeneityBlack,
}

impl DeviationCategory {
    pub fn chart_title(self) -> &'static str {
        match self {
            DeviationCategory::LuminanceWhite => "Luminance White Chart",
            DeviationCategory::LuminanceBlack => "Luminance Black Chart",
            DeviationCategory::Contrast => "Contrast Chart",
            DeviationCategory::HomogeneityWhite => "Homogeneity (White) Chart",
            DeviationCategory::HomogeneityBlack => "Homogeneity (Black) Chart",
        }
    }
}

/// One initial/final pairing inside a deviation category. For the luminance
/// categories the values are the raw spotmeter readings; for contrast and
/// homogeneity they are the computed ratios.
#[derive(Debug, Clone, Serialize)]
pub struct PairedDeviation {
    pub dut_name: String,
    pub initial_value: f64,
    pub final_value: f64,
    pub deviation: Deviation,
}

/// A paired DUT that could not participate in one category.
#[derive(Debug, Clone, Serialize)]
pub struct PairingExclusion {
    pub dut_name: String,
    pub category: DeviationCategory,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviationReport {
    pub luminance_white: Vec<PairedDeviation>,
    pub luminance_black: Vec<PairedDeviation>,
    pub contrast: Vec<PairedDeviation>,
    pub homogeneity_white: Vec<PairedDeviation>,
    pub homogeneity_black: Vec<PairedDeviation>,
    pub exclusions: Vec<PairingExclusion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub dut_name: String,
    pub initial_value: f64,
    pub final_value: f64,
}

/// Data for one grouped bar chart. Turning this into pixels is the
/// consumer's job.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

/// Everything the presentation layer needs for one processed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<DutRecord>,
    pub failures: Vec<FileFailure>,
    pub deviations: DeviationReport,
    pub charts: Vec<ChartSeries>,
}
