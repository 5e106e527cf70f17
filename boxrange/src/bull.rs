//! Bull-market box detection.
//!
//! Mirror of the bear scan: a box opens at a significant high (the highest
//! high within `lookback_days` on both sides), needs a pullback of at least
//! `drop_threshold`, and closes when price breaks out above the opening high
//! by `break_threshold` percent or the series ends.

use serde::Serialize;
use tracing::debug;

use crate::bar::{PricePoint, PriceSeries};
use crate::config::BullBoxConfig;
use crate::constant::{BoxExit, Const, BOX_PALETTE};
use crate::utils::{first_min_low_index, round2};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BullBox {
    pub cycle_id: u32,
    pub box_id: u32,
    pub start_day: u32,
    pub start_timestamp: String,
    pub start_rate: f64,
    pub low_day: u32,
    pub low_timestamp: String,
    pub low_rate: f64,
    pub end_day: u32,
    pub end_timestamp: String,
    pub end_rate: f64,
    pub drop_percent: f64,
    pub duration_days: u32,
    pub broken: bool,
    pub exit: BoxExit,
}

impl BullBox {
    pub fn contains_day(&self, day: u32) -> bool {
        self.start_day <= day && day <= self.end_day
    }

    pub fn color(&self) -> &'static str {
        BOX_PALETTE[(self.box_id.saturating_sub(1) as usize) % BOX_PALETTE.len()]
    }
}

struct BullExit {
    end_idx: usize,
    low_idx: usize,
    exit: BoxExit,
}

pub struct BullBoxDetector {
    config: BullBoxConfig,
}

impl Default for BullBoxDetector {
    fn default() -> Self {
        Self::new(BullBoxConfig::default())
    }
}

impl BullBoxDetector {
    pub fn new(config: BullBoxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BullBoxConfig {
        &self.config
    }

    pub fn detect(&self, series: &PriceSeries) -> Vec<BullBox> {
        let points = series.since_day(self.config.min_days_from_peak);
        if points.len() < Const::BULL_MIN_POINTS {
            debug!(
                cycle = series.cycle_id(),
                points = points.len(),
                "not enough points for bull box scan"
            );
            return Vec::new();
        }

        let cfg = &self.config;
        let mut boxes = Vec::new();
        let mut cursor = 0usize;

        while cursor < points.len() {
            if !is_significant_high(points, cursor, cfg.lookback_days) {
                cursor += 1;
                continue;
            }

            let high_idx = cursor;
            let Some(drop_idx) = find_drop_low(points, high_idx, cfg.drop_threshold) else {
                cursor += 1;
                continue;
            };

            let mut exit = find_exit(points, high_idx, drop_idx, cfg.break_threshold);
            // Guard only: find_exit never moves the low past the exit day.
            if exit.low_idx > exit.end_idx {
                exit.low_idx = first_min_low_index(points, high_idx, exit.end_idx);
            }

            let start = &points[high_idx];
            let low = &points[exit.low_idx];
            let end = &points[exit.end_idx];
            let duration_days = end.day - start.day;
            if duration_days < cfg.min_duration_days {
                cursor = exit.end_idx + 1;
                continue;
            }

            let box_id = boxes.len() as u32 + 1;
            boxes.push(BullBox {
                cycle_id: series.cycle_id(),
                box_id,
                start_day: start.day,
                start_timestamp: start.timestamp.clone(),
                start_rate: round2(start.high_rate),
                low_day: low.day,
                low_timestamp: low.timestamp.clone(),
                low_rate: round2(low.low_rate),
                end_day: end.day,
                end_timestamp: end.timestamp.clone(),
                end_rate: round2(end.high_rate),
                drop_percent: round2(start.high_rate - low.low_rate),
                duration_days,
                broken: true,
                exit: exit.exit,
            });

            cursor = exit.end_idx + 1;
        }

        debug!(
            cycle = series.cycle_id(),
            boxes = boxes.len(),
            "bull box scan finished"
        );
        boxes
    }
}

/// Local-maximum test over `[idx - lookback, idx + lookback]`, clipped to the
/// series.
fn is_significant_high(points: &[PricePoint], idx: usize, lookback: usize) -> bool {
    let start = idx.saturating_sub(lookback);
    let end = idx
        .saturating_add(lookback)
        .saturating_add(1)
        .min(points.len());
    let current = points[idx].high_rate;
    points[start..end].iter().all(|x| x.high_rate <= current)
}

/// Index of the running low that first sits `drop_threshold` under the high.
fn find_drop_low(points: &[PricePoint], high_idx: usize, drop_threshold: f64) -> Option<usize> {
    let high = points[high_idx].high_rate;
    let mut min_low = high;
    let mut min_idx = high_idx;
    for idx in high_idx + 1..points.len() {
        if points[idx].low_rate < min_low {
            min_low = points[idx].low_rate;
            min_idx = idx;
        }
        if high - min_low >= drop_threshold {
            return Some(min_idx);
        }
    }
    None
}

fn find_exit(
    points: &[PricePoint],
    high_idx: usize,
    drop_idx: usize,
    break_threshold: f64,
) -> BullExit {
    let high = points[high_idx].high_rate;
    let break_level = high + high * break_threshold / 100.0;

    let mut low_idx = drop_idx;
    for idx in drop_idx + 1..points.len() {
        if points[idx].high_rate >= break_level {
            return BullExit {
                end_idx: idx,
                low_idx,
                exit: BoxExit::Break,
            };
        }
        if points[idx].low_rate < points[low_idx].low_rate {
            low_idx = idx;
        }
    }

    BullExit {
        end_idx: points.len() - 1,
        low_idx,
        exit: BoxExit::WindowEnd,
    }
}
