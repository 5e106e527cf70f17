use serde::Serialize;

use crate::bar::{PricePoint, PriceSeries};
use crate::bear::BearBox;
use crate::bull::BullBox;
use crate::constant::Const;
use crate::utils::{format_date, round2};

/// One plotted day with the metrics of the box around it.
///
/// `prev_extreme` is the previous bear box peak (bear lines) or the previous
/// bull box low (bull lines).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedVertex {
    pub day: u32,
    pub rate: f64,
    pub timestamp: String,
    pub box_id: Option<u32>,
    pub box_day: Option<u32>,
    pub box_duration: Option<u32>,
    pub box_low: Option<f64>,
    pub box_high: Option<f64>,
    pub prev_extreme: f64,
}

pub struct LineAnnotator;

impl LineAnnotator {
    /// Bear line over `day <= max_duration_days`, plotted on the daily low.
    pub fn bear_line(
        series: &PriceSeries,
        boxes: &[BearBox],
        max_duration_days: u32,
    ) -> Vec<AnnotatedVertex> {
        let mut sweep = BoxSweep::new(boxes.len());
        let mut prev_high = Const::PEAK_RATE;

        series
            .until_day(max_duration_days)
            .iter()
            .map(|point| {
                while let Some(b) =
                    sweep.next_reference(boxes, |b: &BearBox| b.peak_day < point.day)
                {
                    prev_high = b.peak_rate;
                }
                let current = sweep
                    .enclosing(boxes, point.day, |b: &BearBox| b.end_day, BearBox::contains_day)
                    .map(|b| Enclosing {
                        box_id: b.box_id,
                        start_day: b.start_day,
                        duration_days: b.duration_days,
                        low: b.start_rate,
                        high: b.peak_rate,
                    });
                vertex(point, point.low_rate, current, prev_high)
            })
            .collect()
    }

    /// Bull line over `day >= min_days_from_peak`, plotted on the daily high.
    ///
    /// Before the first box the reference is the series' first high.
    pub fn bull_line(
        series: &PriceSeries,
        boxes: &[BullBox],
        min_days_from_peak: u32,
    ) -> Vec<AnnotatedVertex> {
        let mut sweep = BoxSweep::new(boxes.len());
        let mut prev_low = series
            .first()
            .map(|x| x.high_rate)
            .unwrap_or(Const::PEAK_RATE);

        series
            .since_day(min_days_from_peak)
            .iter()
            .map(|point| {
                while let Some(b) =
                    sweep.next_reference(boxes, |b: &BullBox| b.low_day < point.day)
                {
                    prev_low = b.low_rate;
                }
                let current = sweep
                    .enclosing(boxes, point.day, |b: &BullBox| b.end_day, BullBox::contains_day)
                    .map(|b| Enclosing {
                        box_id: b.box_id,
                        start_day: b.start_day,
                        duration_days: b.duration_days,
                        low: b.low_rate,
                        high: b.start_rate,
                    });
                vertex(point, point.high_rate, current, prev_low)
            })
            .collect()
    }
}

/// Forward pointers over boxes ordered by start day; both only ever advance
/// because days are visited in ascending order.
struct BoxSweep {
    reference_idx: usize,
    enclosing_idx: usize,
    len: usize,
}

struct Enclosing {
    box_id: u32,
    start_day: u32,
    duration_days: u32,
    low: f64,
    high: f64,
}

impl BoxSweep {
    fn new(len: usize) -> Self {
        Self {
            reference_idx: 0,
            enclosing_idx: 0,
            len,
        }
    }

    fn next_reference<'a, B>(
        &mut self,
        boxes: &'a [B],
        precedes: impl Fn(&B) -> bool,
    ) -> Option<&'a B> {
        if self.reference_idx < self.len && precedes(&boxes[self.reference_idx]) {
            self.reference_idx += 1;
            return Some(&boxes[self.reference_idx - 1]);
        }
        None
    }

    fn enclosing<'a, B>(
        &mut self,
        boxes: &'a [B],
        day: u32,
        end_day: impl Fn(&B) -> u32,
        contains: impl Fn(&B, u32) -> bool,
    ) -> Option<&'a B> {
        while self.enclosing_idx < self.len && end_day(&boxes[self.enclosing_idx]) < day {
            self.enclosing_idx += 1;
        }
        boxes
            .get(self.enclosing_idx)
            .filter(|b| contains(*b, day))
    }
}

fn vertex(
    point: &PricePoint,
    rate: f64,
    current: Option<Enclosing>,
    prev_extreme: f64,
) -> AnnotatedVertex {
    AnnotatedVertex {
        day: point.day,
        rate: round2(rate),
        timestamp: format_date(&point.timestamp),
        box_id: current.as_ref().map(|b| b.box_id),
        box_day: current.as_ref().map(|b| point.day - b.start_day + 1),
        box_duration: current.as_ref().map(|b| b.duration_days),
        box_low: current.as_ref().map(|b| b.low),
        box_high: current.as_ref().map(|b| b.high),
        prev_extreme,
    }
}
