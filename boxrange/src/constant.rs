use std::fmt::{Display, Formatter};

use serde::Serialize;

/// How a box was closed.
///
/// `Break` is a confirmed move beyond the break level. `WindowEnd` means the
/// scan ran out of window (bear) or data (bull) without a break; such boxes
/// still report `broken = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxExit {
    Break,
    WindowEnd,
}

pub const BOX_PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#EF4444", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
];

pub const COLOR_NAMES: [&str; 8] = [
    "blue", "green", "red", "orange", "purple", "pink", "cyan", "lime",
];

pub struct Const;

impl Const {
    pub const BEAR_MIN_POINTS: usize = 50;
    pub const BULL_MIN_POINTS: usize = 20;
    pub const PEAK_RATE: f64 = 100.0;
}

#[derive(Debug)]
pub enum DataError {
    UnorderedDays {
        cycle_id: u32,
        previous: u32,
        current: u32,
    },
    UnsupportedFormat(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Polars(polars::error::PolarsError),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnorderedDays {
                cycle_id,
                previous,
                current,
            } => write!(
                f,
                "cycle {cycle_id}: day {current} does not follow day {previous}"
            ),
            Self::UnsupportedFormat(v) => write!(f, "unsupported data format: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for DataError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}
