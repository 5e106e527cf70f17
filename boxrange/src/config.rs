use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::DataError;

/// Thresholds for bear-market boxes. Percentages are in rate points
/// (percent of the cycle peak); out-of-range values are the caller's problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BearBoxConfig {
    pub rise_threshold: f64,
    pub break_threshold: f64,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
    pub min_drop_from_prev_high: f64,
}

/// Thresholds for bull-market boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BullBoxConfig {
    pub min_days_from_peak: u32,
    pub drop_threshold: f64,
    pub break_threshold: f64,
    pub min_duration_days: u32,
    pub lookback_days: usize,
}

impl Default for BearBoxConfig {
    fn default() -> Self {
        Self {
            rise_threshold: 5.0,
            break_threshold: 2.0,
            min_duration_days: 1,
            max_duration_days: 420,
            min_drop_from_prev_high: 3.0,
        }
    }
}

impl Default for BullBoxConfig {
    fn default() -> Self {
        Self {
            min_days_from_peak: 420,
            drop_threshold: 5.0,
            break_threshold: 2.0,
            min_duration_days: 1,
            lookback_days: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BearBoxConfigPatch {
    pub rise_threshold: Option<f64>,
    pub break_threshold: Option<f64>,
    pub min_duration_days: Option<u32>,
    pub max_duration_days: Option<u32>,
    pub min_drop_from_prev_high: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BullBoxConfigPatch {
    pub min_days_from_peak: Option<u32>,
    pub drop_threshold: Option<f64>,
    pub break_threshold: Option<f64>,
    pub min_duration_days: Option<u32>,
    pub lookback_days: Option<usize>,
}

impl BearBoxConfig {
    pub fn apply_patch(mut self, patch: BearBoxConfigPatch) -> Self {
        if let Some(v) = patch.rise_threshold {
            self.rise_threshold = v;
        }
        if let Some(v) = patch.break_threshold {
            self.break_threshold = v;
        }
        if let Some(v) = patch.min_duration_days {
            self.min_duration_days = v;
        }
        if let Some(v) = patch.max_duration_days {
            self.max_duration_days = v;
        }
        if let Some(v) = patch.min_drop_from_prev_high {
            self.min_drop_from_prev_high = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let patch: BearBoxConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&raw)?)
    }
}

impl BullBoxConfig {
    pub fn apply_patch(mut self, patch: BullBoxConfigPatch) -> Self {
        if let Some(v) = patch.min_days_from_peak {
            self.min_days_from_peak = v;
        }
        if let Some(v) = patch.drop_threshold {
            self.drop_threshold = v;
        }
        if let Some(v) = patch.break_threshold {
            self.break_threshold = v;
        }
        if let Some(v) = patch.min_duration_days {
            self.min_duration_days = v;
        }
        if let Some(v) = patch.lookback_days {
            self.lookback_days = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let patch: BullBoxConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&raw)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhasePatch {
    #[serde(default)]
    pub bear: BearBoxConfigPatch,
    #[serde(default)]
    pub bull: BullBoxConfigPatch,
}

/// Defaults plus per-cycle overrides, e.g.
///
/// ```yaml
/// default:
///   bear:
///     rise_threshold: 6.0
/// cycle:
///   "4":
///     bull:
///       lookback_days: 7
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoxProfileConfig {
    #[serde(default)]
    pub default: PhasePatch,
    #[serde(default)]
    pub cycle: HashMap<String, PhasePatch>,
}

impl BoxProfileConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&raw)?)
    }

    pub fn resolve_for(&self, cycle_id: u32) -> (BearBoxConfig, BullBoxConfig) {
        let mut bear = BearBoxConfig::default().apply_patch(self.default.bear.clone());
        let mut bull = BullBoxConfig::default().apply_patch(self.default.bull.clone());

        if let Some(patch) = self.cycle.get(&cycle_id.to_string()) {
            bear = bear.apply_patch(patch.bear.clone());
            bull = bull.apply_patch(patch.bull.clone());
        }

        (bear, bull)
    }
}
