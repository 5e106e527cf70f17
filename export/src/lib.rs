use std::collections::BTreeMap;

use boxrange::{
    ComparisonChart, ComparisonSeriesBuilder, CycleAnalysis, CycleAnalysisEngine, PriceSeries,
};
use serde::Serialize;
use tracing::info;

/// Document read by the chart pages: the comparison overlay plus the bear and
/// bull analysis of every cycle.
#[derive(Debug, Serialize)]
pub struct ExportPayload {
    pub comparison: ComparisonChart,
    pub cycles: Vec<CycleAnalysis>,
}

pub fn build_payload(
    engine: &CycleAnalysisEngine,
    cycles: &BTreeMap<u32, PriceSeries>,
    parallel: bool,
) -> ExportPayload {
    let analyses = if parallel {
        engine.analyze_parallel(cycles)
    } else {
        engine.analyze_all(cycles)
    };
    info!(cycles = analyses.len(), "payload built");

    ExportPayload {
        comparison: ComparisonSeriesBuilder::build(cycles),
        cycles: analyses,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use boxrange::{CycleAnalysisEngine, PricePoint, PriceSeries};

    use super::build_payload;

    fn flat_cycle(cycle_id: u32, days: u32) -> PriceSeries {
        let points = (0..days)
            .map(|day| PricePoint {
                day,
                timestamp: format!("2020-01-{:02}", day % 28 + 1),
                close_rate: 100.0,
                low_rate: 100.0,
                high_rate: 100.0,
            })
            .collect();
        PriceSeries::new(cycle_id, points).expect("ordered days")
    }

    #[test]
    fn payload_has_comparison_and_cycles_keys() {
        let mut cycles = BTreeMap::new();
        cycles.insert(2, flat_cycle(2, 60));
        cycles.insert(3, flat_cycle(3, 30));

        let engine = CycleAnalysisEngine::default();
        let payload = build_payload(&engine, &cycles, false);
        let value = serde_json::to_value(&payload).expect("serializable");

        assert_eq!(value["comparison"]["series"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["comparison"]["max_day"], 59);
        assert_eq!(value["cycles"][0]["cycle_id"], 2);
        assert_eq!(value["cycles"][0]["bear"]["line"].as_array().map(Vec::len), Some(60));
        assert_eq!(value["cycles"][0]["bear"]["boxes"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["cycles"][1]["bull"]["line"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["cycles"][1]["bear"]["info"]["start_month"], "2020.01");
    }

    #[test]
    fn parallel_payload_matches_sequential() {
        let mut cycles = BTreeMap::new();
        cycles.insert(1, flat_cycle(1, 55));
        cycles.insert(4, flat_cycle(4, 70));

        let engine = CycleAnalysisEngine::default();
        let sequential = build_payload(&engine, &cycles, false);
        let parallel = build_payload(&engine, &cycles, true);
        assert_eq!(
            serde_json::to_string(&sequential).expect("json"),
            serde_json::to_string(&parallel).expect("json")
        );
    }
}
