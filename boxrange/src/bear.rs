//! Bear-market box detection.
//!
//! A bear box opens at a low that is followed by a bounce of at least
//! `rise_threshold`, keeps the highest high of the bounce as its peak, and
//! closes when price breaks below the low by `break_threshold` percent (or
//! when the scan window runs out).

use serde::Serialize;
use tracing::debug;

use crate::bar::{PricePoint, PriceSeries};
use crate::config::BearBoxConfig;
use crate::constant::{BoxExit, Const, BOX_PALETTE};
use crate::utils::{first_max_high_index, round2};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BearBox {
    pub cycle_id: u32,
    pub box_id: u32,
    pub start_day: u32,
    pub start_timestamp: String,
    pub start_rate: f64,
    pub peak_day: u32,
    pub peak_timestamp: String,
    pub peak_rate: f64,
    pub end_day: u32,
    pub end_timestamp: String,
    pub end_rate: f64,
    pub rise_percent: f64,
    pub duration_days: u32,
    pub broken: bool,
    pub exit: BoxExit,
}

impl BearBox {
    pub fn contains_day(&self, day: u32) -> bool {
        self.start_day <= day && day <= self.end_day
    }

    pub fn color(&self) -> &'static str {
        BOX_PALETTE[(self.box_id.saturating_sub(1) as usize) % BOX_PALETTE.len()]
    }
}

struct BearExit {
    end_idx: usize,
    peak_idx: usize,
    exit: BoxExit,
}

pub struct BearBoxDetector {
    config: BearBoxConfig,
}

impl Default for BearBoxDetector {
    fn default() -> Self {
        Self::new(BearBoxConfig::default())
    }
}

impl BearBoxDetector {
    pub fn new(config: BearBoxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BearBoxConfig {
        &self.config
    }

    pub fn detect(&self, series: &PriceSeries) -> Vec<BearBox> {
        let points = series.until_day(self.config.max_duration_days);
        if points.len() < Const::BEAR_MIN_POINTS {
            debug!(
                cycle = series.cycle_id(),
                points = points.len(),
                "not enough points for bear box scan"
            );
            return Vec::new();
        }

        let cfg = &self.config;
        let mut boxes = Vec::new();
        let mut prev_box_high = Const::PEAK_RATE;
        let mut cursor = 1usize;

        while cursor < points.len() {
            let Some(low_idx) = find_true_low(points, cursor, cfg.rise_threshold) else {
                break;
            };
            let low = points[low_idx].low_rate;

            if prev_box_high - low < cfg.min_drop_from_prev_high {
                cursor = low_idx + 1;
                continue;
            }

            let Some(rise_idx) = find_rise_peak(points, low_idx, cfg.rise_threshold) else {
                cursor = low_idx + 1;
                continue;
            };

            let mut exit = find_exit(points, low_idx, rise_idx, cfg);
            // Guard only: find_exit never moves the peak past the exit day.
            if exit.peak_idx > exit.end_idx {
                exit.peak_idx = first_max_high_index(points, low_idx, exit.end_idx);
            }

            let start = &points[low_idx];
            let peak = &points[exit.peak_idx];
            let end = &points[exit.end_idx];
            let duration_days = end.day - start.day;
            if duration_days < cfg.min_duration_days {
                cursor = exit.end_idx + 1;
                continue;
            }

            let box_id = boxes.len() as u32 + 1;
            boxes.push(BearBox {
                cycle_id: series.cycle_id(),
                box_id,
                start_day: start.day,
                start_timestamp: start.timestamp.clone(),
                start_rate: round2(low),
                peak_day: peak.day,
                peak_timestamp: peak.timestamp.clone(),
                peak_rate: round2(peak.high_rate),
                end_day: end.day,
                end_timestamp: end.timestamp.clone(),
                end_rate: round2(end.low_rate),
                rise_percent: round2(peak.high_rate - low),
                duration_days,
                broken: true,
                exit: exit.exit,
            });

            prev_box_high = peak.high_rate;
            cursor = exit.end_idx + 1;
        }

        debug!(
            cycle = series.cycle_id(),
            boxes = boxes.len(),
            "bear box scan finished"
        );
        boxes
    }
}

/// Lowest low from `start` that a later day bounces off by `rise_threshold`.
///
/// A new lower low resets the bounce check; the low's own day never counts as
/// its bounce.
fn find_true_low(points: &[PricePoint], start: usize, rise_threshold: f64) -> Option<usize> {
    let mut min_idx = start;
    for idx in start..points.len() {
        if points[idx].low_rate < points[min_idx].low_rate {
            min_idx = idx;
        }
        if idx > min_idx && points[idx].high_rate - points[min_idx].low_rate >= rise_threshold {
            return Some(min_idx);
        }
    }
    None
}

/// First day whose running high clears the low by `rise_threshold`; returns
/// the index of that running high.
fn find_rise_peak(points: &[PricePoint], low_idx: usize, rise_threshold: f64) -> Option<usize> {
    let low = points[low_idx].low_rate;
    let mut max_high = low;
    let mut max_idx = low_idx;
    for idx in low_idx + 1..points.len() {
        if points[idx].high_rate > max_high {
            max_high = points[idx].high_rate;
            max_idx = idx;
        }
        if max_high - low >= rise_threshold {
            return Some(max_idx);
        }
    }
    None
}

fn find_exit(
    points: &[PricePoint],
    low_idx: usize,
    rise_idx: usize,
    cfg: &BearBoxConfig,
) -> BearExit {
    let low = points[low_idx].low_rate;
    let break_level = low - low * cfg.break_threshold / 100.0;
    let window_limit = points[low_idx].day.saturating_add(cfg.max_duration_days);
    let window_end = points.partition_point(|x| x.day < window_limit);

    let mut peak_idx = rise_idx;
    for idx in rise_idx + 1..window_end {
        if points[idx].low_rate <= break_level {
            return BearExit {
                end_idx: idx,
                peak_idx,
                exit: BoxExit::Break,
            };
        }
        if points[idx].high_rate > points[peak_idx].high_rate {
            peak_idx = idx;
        }
    }

    BearExit {
        end_idx: window_end.saturating_sub(1).max(low_idx),
        peak_idx,
        exit: BoxExit::WindowEnd,
    }
}
