use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::annotate::{AnnotatedVertex, LineAnnotator};
use crate::bar::PriceSeries;
use crate::bear::{BearBox, BearBoxDetector};
use crate::bull::{BullBox, BullBoxDetector};
use crate::config::BoxProfileConfig;
use crate::utils::format_month;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleInfo {
    pub start_month: String,
    pub end_month: String,
    pub max_day: Option<u32>,
}

impl CycleInfo {
    pub fn of(series: &PriceSeries) -> Self {
        Self {
            start_month: series
                .first()
                .map(|x| format_month(&x.timestamp))
                .unwrap_or_default(),
            end_month: series
                .last()
                .map(|x| format_month(&x.timestamp))
                .unwrap_or_default(),
            max_day: series.max_day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BearAnalysis {
    pub info: CycleInfo,
    pub boxes: Vec<BearBox>,
    pub line: Vec<AnnotatedVertex>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BullAnalysis {
    pub info: CycleInfo,
    pub boxes: Vec<BullBox>,
    pub line: Vec<AnnotatedVertex>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleAnalysis {
    pub cycle_id: u32,
    pub bear: BearAnalysis,
    pub bull: BullAnalysis,
}

/// Runs both detectors and their annotations over each cycle.
///
/// The bear side sees the cycle up to `max_duration_days` and the bull side
/// from `min_days_from_peak` on, the same slices the chart pages request.
#[derive(Default)]
pub struct CycleAnalysisEngine {
    profile: BoxProfileConfig,
}

impl CycleAnalysisEngine {
    pub fn new(profile: BoxProfileConfig) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &BoxProfileConfig {
        &self.profile
    }

    pub fn analyze(&self, series: &PriceSeries) -> CycleAnalysis {
        let (bear_config, bull_config) = self.profile.resolve_for(series.cycle_id());

        let bear_series = series.split_until(bear_config.max_duration_days);
        let bear_boxes = BearBoxDetector::new(bear_config.clone()).detect(&bear_series);
        let bear_line =
            LineAnnotator::bear_line(&bear_series, &bear_boxes, bear_config.max_duration_days);

        let bull_series = series.split_from(bull_config.min_days_from_peak);
        let bull_boxes = BullBoxDetector::new(bull_config.clone()).detect(&bull_series);
        let bull_line =
            LineAnnotator::bull_line(&bull_series, &bull_boxes, bull_config.min_days_from_peak);

        info!(
            cycle = series.cycle_id(),
            bear_boxes = bear_boxes.len(),
            bull_boxes = bull_boxes.len(),
            "cycle analyzed"
        );

        CycleAnalysis {
            cycle_id: series.cycle_id(),
            bear: BearAnalysis {
                info: CycleInfo::of(&bear_series),
                boxes: bear_boxes,
                line: bear_line,
            },
            bull: BullAnalysis {
                info: CycleInfo::of(&bull_series),
                boxes: bull_boxes,
                line: bull_line,
            },
        }
    }

    pub fn analyze_all(&self, cycles: &BTreeMap<u32, PriceSeries>) -> Vec<CycleAnalysis> {
        cycles.values().map(|series| self.analyze(series)).collect()
    }

    /// Same output as [`Self::analyze_all`], one scoped thread per cycle.
    pub fn analyze_parallel(&self, cycles: &BTreeMap<u32, PriceSeries>) -> Vec<CycleAnalysis> {
        crossbeam::thread::scope(|scope| {
            let handles = cycles
                .values()
                .map(|series| scope.spawn(move |_| self.analyze(series)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|e| std::panic::resume_unwind(e))
    }
}
