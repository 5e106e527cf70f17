use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::bar::{PricePoint, PriceSeries};
use crate::constant::DataError;

/// One long-format row as delivered by the cycle data store.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleRow {
    #[serde(alias = "cycle")]
    pub cycle_number: u32,
    #[serde(alias = "day")]
    pub days_since_peak: u32,
    #[serde(default)]
    pub timestamp: String,
    #[serde(alias = "close")]
    pub close_rate: f64,
    #[serde(alias = "low")]
    pub low_rate: f64,
    #[serde(alias = "high")]
    pub high_rate: f64,
}

impl CycleRow {
    pub fn into_point(self) -> PricePoint {
        PricePoint {
            day: self.days_since_peak,
            timestamp: self.timestamp,
            close_rate: self.close_rate,
            low_rate: self.low_rate,
            high_rate: self.high_rate,
        }
    }
}

pub struct CycleDataLoader;

impl CycleDataLoader {
    /// Reads rows from a `.csv` file or a `.json` array.
    pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<CycleRow>, DataError> {
        let path = path.as_ref();
        let rows = match path.extension().and_then(|x| x.to_str()) {
            Some("csv") => {
                let mut reader = csv::Reader::from_path(path)?;
                let mut out = Vec::new();
                for row in reader.deserialize::<CycleRow>() {
                    out.push(row?);
                }
                out
            }
            Some("json") => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
            other => {
                return Err(DataError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ));
            }
        };
        info!(path = %path.display(), rows = rows.len(), "cycle rows loaded");
        Ok(rows)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<BTreeMap<u32, PriceSeries>, DataError> {
        group_by_cycle(Self::load_rows(path)?)
    }
}

/// Partitions rows by cycle, keeping their input order, and validates each
/// cycle as a series.
pub fn group_by_cycle(
    rows: impl IntoIterator<Item = CycleRow>,
) -> Result<BTreeMap<u32, PriceSeries>, DataError> {
    let mut grouped: BTreeMap<u32, Vec<PricePoint>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.cycle_number)
            .or_default()
            .push(row.into_point());
    }

    grouped
        .into_iter()
        .map(|(cycle_id, points)| Ok((cycle_id, PriceSeries::new(cycle_id, points)?)))
        .collect()
}
