use std::collections::BTreeMap;

use boxrange::{
    bear_box_frame, bull_box_frame, write_box_tables, BoxProfileConfig, CycleAnalysisEngine,
    PricePoint, PriceSeries,
};

fn point(day: u32, low: f64, high: f64) -> PricePoint {
    PricePoint {
        day,
        timestamp: format!("2018-{:02}-{:02}", day / 28 % 12 + 1, day % 28 + 1),
        close_rate: (low + high) / 2.0,
        low_rate: low,
        high_rate: high,
    }
}

/// Bear range on days 5..=51 and a bull range on days 421..=441 in one cycle.
fn full_cycle(cycle_id: u32) -> PriceSeries {
    let mut points: Vec<_> = (0..=60)
        .map(|day| match day {
            0..=4 => point(day, 100.0, 100.0),
            5 => point(day, 90.0, 90.0),
            6..=9 => point(day, 91.0, 93.0),
            10 => point(day, 92.0, 96.0),
            11..=50 => point(day, 91.0, 95.0),
            51 => point(day, 87.0, 90.0),
            _ => point(day, 87.0, 88.0),
        })
        .collect();
    points.extend((0..40).map(|k| {
        let day = 421 + k;
        match k {
            0 => point(day, 99.0, 100.0),
            1..=4 => {
                let low = 100.0 - 1.2 * f64::from(k);
                point(day, low, low + 0.5)
            }
            5 => point(day, 94.0, 95.0),
            6..=19 => point(day, 95.0, 98.0),
            20 => point(day, 99.0, 103.0),
            _ => {
                let high = 103.0 + f64::from(k - 20);
                point(day, high - 1.0, high)
            }
        }
    }));
    PriceSeries::new(cycle_id, points).expect("ascending days")
}

fn flat_cycle(cycle_id: u32) -> PriceSeries {
    PriceSeries::new(cycle_id, (0..60).map(|day| point(day, 100.0, 100.0)).collect())
        .expect("ascending days")
}

#[test]
fn analyze_splits_cycle_into_bear_and_bull_sides() {
    let analysis = CycleAnalysisEngine::default().analyze(&full_cycle(3));

    assert_eq!(analysis.cycle_id, 3);
    assert_eq!(analysis.bear.boxes.len(), 1);
    assert_eq!(analysis.bear.boxes[0].end_day, 51);
    assert_eq!(analysis.bear.line.len(), 61);
    assert_eq!(analysis.bear.info.max_day, Some(60));
    assert_eq!(analysis.bear.info.start_month, "2018.01");

    assert_eq!(analysis.bull.boxes.len(), 1);
    assert_eq!(analysis.bull.boxes[0].start_day, 421);
    assert_eq!(analysis.bull.line.len(), 40);
    assert_eq!(analysis.bull.line[0].prev_extreme, 100.0);
    assert_eq!(analysis.bull.info.max_day, Some(460));
}

#[test]
fn cycle_override_changes_only_that_cycle() {
    let profile = BoxProfileConfig::from_yaml_str(
        "cycle:\n  \"4\":\n    bear:\n      min_duration_days: 100\n",
    )
    .expect("valid yaml");
    let engine = CycleAnalysisEngine::new(profile);

    assert_eq!(engine.analyze(&full_cycle(3)).bear.boxes.len(), 1);
    assert!(engine.analyze(&full_cycle(4)).bear.boxes.is_empty());
}

#[test]
fn parallel_analysis_matches_sequential() {
    let mut cycles = BTreeMap::new();
    for id in 1..=4 {
        cycles.insert(id, full_cycle(id));
    }
    cycles.insert(5, flat_cycle(5));

    let engine = CycleAnalysisEngine::default();
    let sequential = engine.analyze_all(&cycles);
    let parallel = engine.analyze_parallel(&cycles);

    assert_eq!(sequential, parallel);
    assert_eq!(
        parallel.iter().map(|x| x.cycle_id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert!(parallel[4].bear.boxes.is_empty());
}

#[test]
fn box_frames_have_one_row_per_box() {
    let analysis = CycleAnalysisEngine::default().analyze(&full_cycle(3));

    let bear = bear_box_frame(&analysis.bear.boxes).expect("bear frame");
    assert_eq!(bear.height(), 1);
    assert!(bear.column("rise_percent").is_ok());
    assert!(bear.column("color").is_ok());

    let bull = bull_box_frame(&analysis.bull.boxes).expect("bull frame");
    assert_eq!(bull.height(), 1);
    assert!(bull.column("drop_percent").is_ok());

    let empty = bear_box_frame(&[]).expect("empty frame");
    assert_eq!(empty.height(), 0);
}

#[test]
fn box_tables_are_written_as_parquet() {
    let engine = CycleAnalysisEngine::default();
    let analyses = vec![engine.analyze(&full_cycle(3)), engine.analyze(&flat_cycle(5))];

    let dir = std::env::temp_dir().join("boxrange_engine_tables");
    write_box_tables(&analyses, &dir).expect("write tables");
    assert!(dir.join("bear_boxes.parquet").exists());
    assert!(dir.join("bull_boxes.parquet").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
