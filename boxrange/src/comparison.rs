use std::collections::BTreeMap;

use serde::Serialize;

use crate::bar::PriceSeries;
use crate::constant::{BOX_PALETTE, COLOR_NAMES};
use crate::utils::{format_date, round2};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub x: u32,
    pub y: f64,
}

/// Close-rate curve of one cycle with its summary stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub cycle_id: u32,
    pub name: String,
    pub data: Vec<ComparisonPoint>,
    pub start_date: String,
    pub end_date: String,
    pub day_count: usize,
    pub min_rate: f64,
    pub color: &'static str,
    pub color_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub series: Vec<ComparisonSeries>,
    pub max_day: Option<u32>,
}

pub struct ComparisonSeriesBuilder;

impl ComparisonSeriesBuilder {
    /// Cycles in ascending id order. Colors follow the position among all
    /// cycles, empty ones included, so a cycle keeps its color when a
    /// neighbour has no data.
    pub fn build(cycles: &BTreeMap<u32, PriceSeries>) -> ComparisonChart {
        let mut series = Vec::new();
        for (idx, (cycle_id, cycle)) in cycles.iter().enumerate() {
            let (Some(first), Some(last)) = (cycle.first(), cycle.last()) else {
                continue;
            };

            let start_date = format_date(&first.timestamp);
            let min_rate = cycle
                .points()
                .iter()
                .map(|x| x.close_rate)
                .fold(f64::INFINITY, f64::min);

            series.push(ComparisonSeries {
                cycle_id: *cycle_id,
                name: format!("Cycle {cycle_id} : {start_date}"),
                data: cycle
                    .points()
                    .iter()
                    .map(|x| ComparisonPoint {
                        x: x.day,
                        y: round2(x.close_rate),
                    })
                    .collect(),
                end_date: format_date(&last.timestamp),
                start_date,
                day_count: cycle.len(),
                min_rate: round2(min_rate),
                color: BOX_PALETTE[idx % BOX_PALETTE.len()],
                color_name: COLOR_NAMES[idx % COLOR_NAMES.len()],
            });
        }

        let max_day = cycles.values().filter_map(PriceSeries::max_day).max();
        ComparisonChart { series, max_day }
    }
}
