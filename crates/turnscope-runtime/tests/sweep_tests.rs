use turnscope_runtime::SensitivityRunner;
use turnscope_testing::assertions::assert_close;
use turnscope_testing::fixtures::{diurnal_trace, random_trace};
use turnscope_types::{AnalysisConfig, ParameterGrid, ParameterSet, SweepScalar};

fn depth(hour: u8) -> u32 {
    u32::from(hour % 3) + 1
}

fn gap_grid(gaps: &[f64]) -> Vec<ParameterSet> {
    ParameterGrid {
        gap_thresholds: gaps.to_vec(),
        bin_widths: vec![3_600],
        min_supports: vec![1],
    }
    .expand()
}

#[test]
fn test_gap_sweep_reports_spread() {
    // sessions sit just under an hour apart, so only the 3600s gap merges them
    let records = diurnal_trace(2, depth);
    let config = AnalysisConfig::default();
    let runner = SensitivityRunner::new(&records, &config).unwrap();
    let report = runner.run(&gap_grid(&[900.0, 1_800.0, 3_600.0]));

    assert_eq!(report.runs.len(), 3);
    assert_eq!(report.succeeded().count(), 3);

    let counts = report.spread(SweepScalar::SessionCount).unwrap();
    assert_eq!(counts.values, vec![Some(48.0), Some(48.0), Some(1.0)]);
    assert_close(counts.range.unwrap(), 47.0, 1e-12);
    assert_close(counts.std.unwrap(), 47.0 / 3f64.sqrt(), 1e-9);

    let frac = report.spread(SweepScalar::FractionAtLeast(2)).unwrap();
    assert_close(frac.values[0].unwrap(), 2.0 / 3.0, 1e-12);
    assert_eq!(frac.values[2], Some(1.0));
    assert_close(frac.range.unwrap(), 1.0 / 3.0, 1e-12);

    assert_eq!(report.tolerance, 0.01);
    assert_eq!(report.robust, Some(false));
}

#[test]
fn test_stable_gaps_are_robust() {
    let records = diurnal_trace(2, depth);
    let config = AnalysisConfig::default();
    let report = SensitivityRunner::new(&records, &config)
        .unwrap()
        .run(&gap_grid(&[900.0, 1_800.0]));

    assert_eq!(report.robust, Some(true));
    let frac = report.spread(SweepScalar::FractionAtLeast(2)).unwrap();
    assert_eq!(frac.range, Some(0.0));

    assert_eq!(report.hourly_spread.len(), 24);
    assert!(report.hourly_spread.iter().all(|h| h.runs_observed == 2));
    assert!(report.hourly_spread.iter().all(|h| h.std == Some(0.0)));
}

#[test]
fn test_failed_run_does_not_stop_sweep() {
    let records = diurnal_trace(1, depth);
    let config = AnalysisConfig::default();
    let sets = vec![
        ParameterSet::new(900.0, 3_600, 1),
        ParameterSet::new(0.0, 3_600, 1),
        ParameterSet::new(1_800.0, 0, 1),
        ParameterSet::new(1_800.0, 3_600, 1),
    ];
    let report = SensitivityRunner::new(&records, &config).unwrap().run(&sets);

    let parameters: Vec<ParameterSet> = report.runs.iter().map(|r| r.parameters).collect();
    assert_eq!(parameters, sets);
    assert_eq!(report.failed().count(), 2);
    assert!(report.runs[1].error().unwrap().contains("gap_threshold"));
    assert!(report.runs[2].error().unwrap().contains("bin_width"));

    let counts = report.spread(SweepScalar::SessionCount).unwrap();
    assert_eq!(counts.values, vec![Some(24.0), None, None, Some(24.0)]);
    assert_eq!(report.robust, Some(true));
}

#[test]
fn test_single_run_has_no_spread() {
    let records = diurnal_trace(1, depth);
    let config = AnalysisConfig::default();
    let report = SensitivityRunner::new(&records, &config)
        .unwrap()
        .run(&gap_grid(&[900.0]));

    assert!(report.spreads.iter().all(|s| s.std.is_none() && s.range.is_none()));
    assert_eq!(report.robust, None);
}

#[test]
fn test_invalid_config_is_fatal() {
    let records = diurnal_trace(1, depth);
    let config = AnalysisConfig {
        fraction_thresholds: vec![],
        ..AnalysisConfig::default()
    };
    assert!(SensitivityRunner::new(&records, &config).is_err());
}

#[test]
fn test_sweep_is_deterministic() {
    let records = random_trace(7, 2_000, 5.0 * 86_400.0);
    let config = AnalysisConfig::default();
    let runner = SensitivityRunner::new(&records, &config).unwrap();
    let sets = ParameterGrid {
        gap_thresholds: vec![300.0, 900.0, 1_800.0, 3_600.0],
        bin_widths: vec![1_800, 3_600],
        min_supports: vec![1, 5],
    }
    .expand();

    let first = runner.run(&sets);
    let second = runner.run(&sets);
    assert_eq!(first, second);
    assert_eq!(first.runs.len(), 16);
}

#[test]
fn test_sweep_results_do_not_depend_on_run_order() {
    let records = random_trace(11, 1_500, 4.0 * 86_400.0);
    let config = AnalysisConfig::default();
    let runner = SensitivityRunner::new(&records, &config).unwrap();
    let sets = ParameterGrid {
        gap_thresholds: vec![300.0, 900.0, 1_800.0],
        bin_widths: vec![1_800, 3_600],
        min_supports: vec![1, 10],
    }
    .expand();
    let mut reversed = sets.clone();
    reversed.reverse();

    let forward = runner.run(&sets);
    let backward = runner.run(&reversed);

    assert_eq!(forward.runs.len(), 12);
    for run in &forward.runs {
        assert_eq!(backward.get(&run.parameters), Some(run));
    }
    assert_eq!(backward.runs[0].parameters, *sets.last().unwrap());
    assert_eq!(forward.robust, backward.robust);
    for (a, b) in forward.spreads.iter().zip(&backward.spreads) {
        assert_eq!(a.scalar, b.scalar);
        assert_eq!(a.range, b.range);
        assert_close(a.std.unwrap(), b.std.unwrap(), 1e-9);
    }
}

#[test]
fn test_spreads_cover_every_threshold() {
    let records = diurnal_trace(1, depth);
    let config = AnalysisConfig {
        fraction_thresholds: vec![4, 2],
        ..AnalysisConfig::default()
    };
    let report = SensitivityRunner::new(&records, &config)
        .unwrap()
        .run(&gap_grid(&[900.0, 1_800.0]));

    let scalars: Vec<SweepScalar> = report.spreads.iter().map(|s| s.scalar).collect();
    assert_eq!(
        scalars,
        vec![
            SweepScalar::SessionCount,
            SweepScalar::MeanTurnCount,
            SweepScalar::FractionAtLeast(2),
            SweepScalar::FractionAtLeast(4),
            SweepScalar::HourlyStd,
        ]
    );
}
