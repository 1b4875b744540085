use crate::models::{
    BatchReport, ChartPoint, ChartSeries, Deviation, DeviationCategory, DeviationReport,
    DutRecord, PairedDeviation, PairingExclusion, RunLabel, SubValuePair, UploadedFile,
};

use super::processor;

/// Match Initial records against Final records by exact file name. No
/// dedup: a repeated name pairs every initial/final combination.
pub fn pair_records<'a>(
    initial: &'a [DutRecord],
    finals: &'a [DutRecord],
) -> Vec<(&'a DutRecord, &'a DutRecord)> {
    let mut pairs = Vec::new();

    for initial_record in initial {
        for final_record in finals {
            if final_record.file_name == initial_record.file_name {
                pairs.push((initial_record, final_record));
            }
        }
    }

    pairs
}

fn exclude(
    exclusions: &mut Vec<PairingExclusion>,
    dut: &str,
    category: DeviationCategory,
    reason: &str,
) {
    tracing::warn!("{} excluded from {}: {}", dut, category.chart_title(), reason);
    exclusions.push(PairingExclusion {
        dut_name: dut.to_string(),
        category,
        reason: reason.to_string(),
    });
}

fn luminance_entry(
    entries: &mut Vec<PairedDeviation>,
    exclusions: &mut Vec<PairingExclusion>,
    dut: &str,
    category: DeviationCategory,
    initial_value: Option<f64>,
    final_value: Option<f64>,
) {
    let (Some(initial_value), Some(final_value)) = (initial_value, final_value) else {
        exclude(exclusions, dut, category, "missing spotmeter reading");
        return;
    };

    entries.push(PairedDeviation {
        dut_name: dut.to_string(),
        initial_value,
        final_value,
        deviation: Deviation::from_change(initial_value, final_value),
    });
}

fn contrast_entry(
    entries: &mut Vec<PairedDeviation>,
    exclusions: &mut Vec<PairingExclusion>,
    dut: &str,
    initial_record: &DutRecord,
    final_record: &DutRecord,
) {
    let (Some(initial_white), Some(initial_black), Some(final_white), Some(final_black)) = (
        initial_record.spotmeter_white,
        initial_record.spotmeter_black,
        final_record.spotmeter_white,
        final_record.spotmeter_black,
    ) else {
        exclude(
            exclusions,
            dut,
            DeviationCategory::Contrast,
            "missing spotmeter reading",
        );
        return;
    };

    let initial_ratio = initial_white / initial_black;
    let final_ratio = final_white / final_black;

    // Chart values must be finite numbers; a zero black reading makes the
    // contrast ratio itself meaningless, not just the deviation.
    if !initial_ratio.is_finite() || !final_ratio.is_finite() {
        exclude(
            exclusions,
            dut,
            DeviationCategory::Contrast,
            "black spotmeter reading is zero",
        );
        return;
    }

    entries.push(PairedDeviation {
        dut_name: dut.to_string(),
        initial_value: initial_ratio,
        final_value: final_ratio,
        deviation: Deviation::from_change(initial_ratio, final_ratio),
    });
}

fn homogeneity_entry(
    entries: &mut Vec<PairedDeviation>,
    exclusions: &mut Vec<PairingExclusion>,
    dut: &str,
    category: DeviationCategory,
    initial_values: Option<SubValuePair>,
    final_values: Option<SubValuePair>,
) {
    let (Some(initial_values), Some(final_values)) = (initial_values, final_values) else {
        exclude(exclusions, dut, category, "missing homogeneity values");
        return;
    };

    let initial_ratio = initial_values.ratio();
    let final_ratio = final_values.ratio();

    let mut deviation = Deviation::from_change(initial_ratio, final_ratio);
    // An all-zero final pair reads as exactly -100%; reported as 0 instead.
    if deviation == Deviation::Percent(-100.0) {
        deviation = Deviation::Percent(0.0);
    }

    entries.push(PairedDeviation {
        dut_name: dut.to_string(),
        initial_value: initial_ratio,
        final_value: final_ratio,
        deviation,
    });
}

/// Compute the five deviation categories over every filename pairing.
pub fn build_deviation_report(initial: &[DutRecord], finals: &[DutRecord]) -> DeviationReport {
    let mut report = DeviationReport::default();

    for (initial_record, final_record) in pair_records(initial, finals) {
        let dut = initial_record.file_name.as_str();

        luminance_entry(
            &mut report.luminance_white,
            &mut report.exclusions,
            dut,
            DeviationCategory::LuminanceWhite,
            initial_record.spotmeter_white,
            final_record.spotmeter_white,
        );
        luminance_entry(
            &mut report.luminance_black,
            &mut report.exclusions,
            dut,
            DeviationCategory::LuminanceBlack,
            initial_record.spotmeter_black,
            final_record.spotmeter_black,
        );
        contrast_entry(
            &mut report.contrast,
            &mut report.exclusions,
            dut,
            initial_record,
            final_record,
        );
        homogeneity_entry(
            &mut report.homogeneity_white,
            &mut report.exclusions,
            dut,
            DeviationCategory::HomogeneityWhite,
            initial_record.white_values,
            final_record.white_values,
        );
        homogeneity_entry(
            &mut report.homogeneity_black,
            &mut report.exclusions,
            dut,
            DeviationCategory::HomogeneityBlack,
            initial_record.black_values,
            final_record.black_values,
        );
    }

    report
}

/// One grouped-bar series per category with data, in the order the original
/// report presents them.
pub fn chart_series(report: &DeviationReport) -> Vec<ChartSeries> {
    let categories = [
        (DeviationCategory::LuminanceWhite, &report.luminance_white),
        (DeviationCategory::LuminanceBlack, &report.luminance_black),
        (DeviationCategory::Contrast, &report.contrast),
        (DeviationCategory::HomogeneityWhite, &report.homogeneity_white),
        (DeviationCategory::HomogeneityBlack, &report.homogeneity_black),
    ];

    categories
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(category, entries)| ChartSeries {
            title: category.chart_title().to_string(),
            points: entries
                .iter()
                .map(|entry| ChartPoint {
                    dut_name: entry.dut_name.clone(),
                    initial_value: entry.initial_value,
                    final_value: entry.final_value,
                })
                .collect(),
        })
        .collect()
}

/// The pure batch entry point: two tagged file collections in, one
/// structured report out. Rendering is someone else's job.
pub fn analyze_batch(
    initial_files: &[UploadedFile],
    final_files: &[UploadedFile],
) -> BatchReport {
    let initial = processor::process_files(initial_files, RunLabel::Initial);
    let finals = processor::process_files(final_files, RunLabel::Final);

    let deviations = build_deviation_report(&initial.records, &finals.records);
    let charts = chart_series(&deviations);

    let mut records = initial.records;
    records.extend(finals.records);
    let mut failures = initial.failures;
    failures.extend(finals.failures);

    BatchReport {
        records,
        failures,
        deviations,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, run: RunLabel, white: Option<f64>, black: Option<f64>) -> DutRecord {
        DutRecord {
            file_name: name.to_string(),
            run,
            spotmeter_white: white,
            white_values: None,
            spotmeter_black: black,
            black_values: None,
        }
    }

    fn record_with_pairs(
        name: &str,
        run: RunLabel,
        white_values: (f64, f64),
        black_values: (f64, f64),
    ) -> DutRecord {
        DutRecord {
            file_name: name.to_string(),
            run,
            spotmeter_white: None,
            white_values: Some(SubValuePair {
                first: Some(white_values.0),
                second: Some(white_values.1),
            }),
            spotmeter_black: None,
            black_values: Some(SubValuePair {
                first: Some(black_values.0),
                second: Some(black_values.1),
            }),
        }
    }

    fn percent(deviation: Deviation) -> f64 {
        match deviation {
            Deviation::Percent(p) => p,
            Deviation::NonFinite => panic!("expected a finite deviation"),
        }
    }

    #[test]
    fn white_luminance_deviation_of_100_to_110_is_ten_percent() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(100.0), None)];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), None)];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(report.luminance_white.len(), 1);
        let p = percent(report.luminance_white[0].deviation);
        assert!((p - 10.0).abs() < 1e-9);
    }

    #[test]
    fn deviation_against_itself_is_zero() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(87.3), Some(0.4))];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(87.3), Some(0.4))];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(report.luminance_white[0].deviation, Deviation::Percent(0.0));
        assert_eq!(report.luminance_black[0].deviation, Deviation::Percent(0.0));
        assert_eq!(report.contrast[0].deviation, Deviation::Percent(0.0));
    }

    #[test]
    fn unmatched_files_are_excluded_from_every_paired_view() {
        let initial = vec![
            record("A.xlsx", RunLabel::Initial, Some(100.0), Some(0.2)),
            record("only-initial.xlsx", RunLabel::Initial, Some(50.0), Some(0.1)),
        ];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), Some(0.25))];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(report.luminance_white.len(), 1);
        assert_eq!(report.luminance_white[0].dut_name, "A.xlsx");
        assert!(report
            .exclusions
            .iter()
            .all(|e| e.dut_name != "only-initial.xlsx"));
    }

    #[test]
    fn duplicate_names_pair_as_a_cross_product() {
        let initial = vec![
            record("dup.xlsx", RunLabel::Initial, Some(1.0), None),
            record("dup.xlsx", RunLabel::Initial, Some(2.0), None),
        ];
        let finals = vec![
            record("dup.xlsx", RunLabel::Final, Some(3.0), None),
            record("dup.xlsx", RunLabel::Final, Some(4.0), None),
        ];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(report.luminance_white.len(), 4);
    }

    #[test]
    fn zero_initial_luminance_surfaces_as_non_finite() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(0.0), None)];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(5.0), None)];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(report.luminance_white[0].deviation, Deviation::NonFinite);
    }

    #[test]
    fn contrast_ratios_and_deviation() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(100.0), Some(0.2))];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), Some(0.25))];

        let report = build_deviation_report(&initial, &finals);
        let entry = &report.contrast[0];
        assert!((entry.initial_value - 500.0).abs() < 1e-9);
        assert!((entry.final_value - 440.0).abs() < 1e-9);
        assert!((percent(entry.deviation) + 12.0).abs() < 1e-9);
    }

    #[test]
    fn zero_black_reading_excludes_the_dut_from_contrast() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(100.0), Some(0.0))];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), Some(0.25))];

        let report = build_deviation_report(&initial, &finals);
        assert!(report.contrast.is_empty());
        assert!(report
            .exclusions
            .iter()
            .any(|e| e.category == DeviationCategory::Contrast));
        // The luminance views are unaffected.
        assert_eq!(report.luminance_white.len(), 1);
        assert_eq!(report.luminance_black.len(), 1);
    }

    #[test]
    fn missing_optical_field_is_a_reported_exclusion_not_a_panic() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, None, Some(0.2))];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), Some(0.25))];

        let report = build_deviation_report(&initial, &finals);
        assert!(report.luminance_white.is_empty());
        assert_eq!(report.luminance_black.len(), 1);
        assert!(report
            .exclusions
            .iter()
            .any(|e| e.category == DeviationCategory::LuminanceWhite));
    }

    #[test]
    fn zero_initial_sub_value_ratio_is_non_finite_not_zero() {
        // initial pair (0,0) coerces to ratio 0; final ratio is 0.5. The
        // resulting division by zero must surface, not vanish.
        let initial = vec![record_with_pairs(
            "A.xlsx",
            RunLabel::Initial,
            (0.0, 0.0),
            (1.0, 2.0),
        )];
        let finals = vec![record_with_pairs(
            "A.xlsx",
            RunLabel::Final,
            (5.0, 10.0),
            (1.0, 2.0),
        )];

        let report = build_deviation_report(&initial, &finals);
        let entry = &report.homogeneity_white[0];
        assert_eq!(entry.initial_value, 0.0);
        assert!((entry.final_value - 0.5).abs() < 1e-9);
        assert_eq!(entry.deviation, Deviation::NonFinite);
    }

    #[test]
    fn exact_minus_100_percent_sub_value_deviation_is_reported_as_zero() {
        // A final pair collapsing to ratio 0 against a nonzero initial ratio
        // is exactly -100%, which the report normalizes to 0.
        let initial = vec![record_with_pairs(
            "A.xlsx",
            RunLabel::Initial,
            (5.0, 10.0),
            (1.0, 2.0),
        )];
        let finals = vec![record_with_pairs(
            "A.xlsx",
            RunLabel::Final,
            (0.0, 0.0),
            (1.0, 2.0),
        )];

        let report = build_deviation_report(&initial, &finals);
        assert_eq!(
            report.homogeneity_white[0].deviation,
            Deviation::Percent(0.0)
        );
        // The override is specific to sub-value pairs; luminance keeps -100.
        let initial = vec![record("B.xlsx", RunLabel::Initial, Some(100.0), None)];
        let finals = vec![record("B.xlsx", RunLabel::Final, Some(0.0), None)];
        let report = build_deviation_report(&initial, &finals);
        assert_eq!(
            report.luminance_white[0].deviation,
            Deviation::Percent(-100.0)
        );
    }

    #[test]
    fn missing_pair_is_an_exclusion_for_that_color_only() {
        let mut initial_record =
            record_with_pairs("A.xlsx", RunLabel::Initial, (5.0, 10.0), (1.0, 2.0));
        initial_record.black_values = None;
        let finals = vec![record_with_pairs(
            "A.xlsx",
            RunLabel::Final,
            (6.0, 10.0),
            (1.0, 2.0),
        )];

        let report = build_deviation_report(&[initial_record], &finals);
        assert_eq!(report.homogeneity_white.len(), 1);
        assert!(report.homogeneity_black.is_empty());
        assert!(report
            .exclusions
            .iter()
            .any(|e| e.category == DeviationCategory::HomogeneityBlack));
    }

    #[test]
    fn chart_series_skip_empty_categories_and_keep_order() {
        let initial = vec![record("A.xlsx", RunLabel::Initial, Some(100.0), None)];
        let finals = vec![record("A.xlsx", RunLabel::Final, Some(110.0), None)];

        let report = build_deviation_report(&initial, &finals);
        let charts = chart_series(&report);

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Luminance White Chart");
        assert_eq!(charts[0].points.len(), 1);
        assert_eq!(charts[0].points[0].dut_name, "A.xlsx");
        assert_eq!(charts[0].points[0].initial_value, 100.0);
        assert_eq!(charts[0].points[0].final_value, 110.0);
    }
}
