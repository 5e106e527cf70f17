use serde::{Deserialize, Serialize};

use crate::constant::DataError;

/// One daily sample of a cycle. Rates are percent of the cycle peak price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: u32,
    pub timestamp: String,
    pub close_rate: f64,
    pub low_rate: f64,
    pub high_rate: f64,
}

/// Ascending-by-day samples of one cycle.
///
/// Days are strictly increasing; every scan over a series relies on it, so
/// construction rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    cycle_id: u32,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(cycle_id: u32, points: Vec<PricePoint>) -> Result<Self, DataError> {
        for pair in points.windows(2) {
            if pair[1].day <= pair[0].day {
                return Err(DataError::UnorderedDays {
                    cycle_id,
                    previous: pair[0].day,
                    current: pair[1].day,
                });
            }
        }
        Ok(Self { cycle_id, points })
    }

    pub fn cycle_id(&self) -> u32 {
        self.cycle_id
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Points with `day <= max_day`.
    pub fn until_day(&self, max_day: u32) -> &[PricePoint] {
        let end = self.points.partition_point(|x| x.day <= max_day);
        &self.points[..end]
    }

    /// Points with `day >= min_day`.
    pub fn since_day(&self, min_day: u32) -> &[PricePoint] {
        let start = self.points.partition_point(|x| x.day < min_day);
        &self.points[start..]
    }

    /// Sub-series with `day >= min_day`, as a collaborator fetching from
    /// that day onwards would deliver it.
    pub fn split_from(&self, min_day: u32) -> Self {
        Self {
            cycle_id: self.cycle_id,
            points: self.since_day(min_day).to_vec(),
        }
    }

    /// Sub-series with `day <= max_day`.
    pub fn split_until(&self, max_day: u32) -> Self {
        Self {
            cycle_id: self.cycle_id,
            points: self.until_day(max_day).to_vec(),
        }
    }

    pub fn max_day(&self) -> Option<u32> {
        self.points.last().map(|x| x.day)
    }
}
