use std::fs::{create_dir_all, File};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::bear::BearBox;
use crate::bull::BullBox;
use crate::constant::{BoxExit, DataError};
use crate::engine::CycleAnalysis;

fn exit_label(exit: BoxExit) -> &'static str {
    match exit {
        BoxExit::Break => "break",
        BoxExit::WindowEnd => "window_end",
    }
}

pub fn bear_box_frame(boxes: &[BearBox]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "cycle" => boxes.iter().map(|x| x.cycle_id).collect::<Vec<u32>>(),
        "box_id" => boxes.iter().map(|x| x.box_id).collect::<Vec<u32>>(),
        "start_day" => boxes.iter().map(|x| x.start_day).collect::<Vec<u32>>(),
        "start_timestamp" => boxes.iter().map(|x| x.start_timestamp.clone()).collect::<Vec<String>>(),
        "start_rate" => boxes.iter().map(|x| x.start_rate).collect::<Vec<f64>>(),
        "peak_day" => boxes.iter().map(|x| x.peak_day).collect::<Vec<u32>>(),
        "peak_timestamp" => boxes.iter().map(|x| x.peak_timestamp.clone()).collect::<Vec<String>>(),
        "peak_rate" => boxes.iter().map(|x| x.peak_rate).collect::<Vec<f64>>(),
        "end_day" => boxes.iter().map(|x| x.end_day).collect::<Vec<u32>>(),
        "end_timestamp" => boxes.iter().map(|x| x.end_timestamp.clone()).collect::<Vec<String>>(),
        "end_rate" => boxes.iter().map(|x| x.end_rate).collect::<Vec<f64>>(),
        "rise_percent" => boxes.iter().map(|x| x.rise_percent).collect::<Vec<f64>>(),
        "duration_days" => boxes.iter().map(|x| x.duration_days).collect::<Vec<u32>>(),
        "broken" => boxes.iter().map(|x| x.broken).collect::<Vec<bool>>(),
        "exit" => boxes.iter().map(|x| exit_label(x.exit)).collect::<Vec<&str>>(),
        "color" => boxes.iter().map(|x| x.color()).collect::<Vec<&str>>()
    )?;
    Ok(frame)
}

pub fn bull_box_frame(boxes: &[BullBox]) -> Result<DataFrame, DataError> {
    let frame = df!(
        "cycle" => boxes.iter().map(|x| x.cycle_id).collect::<Vec<u32>>(),
        "box_id" => boxes.iter().map(|x| x.box_id).collect::<Vec<u32>>(),
        "start_day" => boxes.iter().map(|x| x.start_day).collect::<Vec<u32>>(),
        "start_timestamp" => boxes.iter().map(|x| x.start_timestamp.clone()).collect::<Vec<String>>(),
        "start_rate" => boxes.iter().map(|x| x.start_rate).collect::<Vec<f64>>(),
        "low_day" => boxes.iter().map(|x| x.low_day).collect::<Vec<u32>>(),
        "low_timestamp" => boxes.iter().map(|x| x.low_timestamp.clone()).collect::<Vec<String>>(),
        "low_rate" => boxes.iter().map(|x| x.low_rate).collect::<Vec<f64>>(),
        "end_day" => boxes.iter().map(|x| x.end_day).collect::<Vec<u32>>(),
        "end_timestamp" => boxes.iter().map(|x| x.end_timestamp.clone()).collect::<Vec<String>>(),
        "end_rate" => boxes.iter().map(|x| x.end_rate).collect::<Vec<f64>>(),
        "drop_percent" => boxes.iter().map(|x| x.drop_percent).collect::<Vec<f64>>(),
        "duration_days" => boxes.iter().map(|x| x.duration_days).collect::<Vec<u32>>(),
        "broken" => boxes.iter().map(|x| x.broken).collect::<Vec<bool>>(),
        "exit" => boxes.iter().map(|x| exit_label(x.exit)).collect::<Vec<&str>>(),
        "color" => boxes.iter().map(|x| x.color()).collect::<Vec<&str>>()
    )?;
    Ok(frame)
}

/// Writes `bear_boxes.parquet` and `bull_boxes.parquet` with the boxes of
/// every analyzed cycle.
pub fn write_box_tables(
    analyses: &[CycleAnalysis],
    output_dir: impl AsRef<Path>,
) -> Result<(), DataError> {
    let output_dir = output_dir.as_ref();
    create_dir_all(output_dir)?;

    let bear = analyses
        .iter()
        .flat_map(|x| x.bear.boxes.iter().cloned())
        .collect::<Vec<_>>();
    let mut bear_file = File::create(output_dir.join("bear_boxes.parquet"))?;
    let mut bear_df = bear_box_frame(&bear)?;
    ParquetWriter::new(&mut bear_file).finish(&mut bear_df)?;

    let bull = analyses
        .iter()
        .flat_map(|x| x.bull.boxes.iter().cloned())
        .collect::<Vec<_>>();
    let mut bull_file = File::create(output_dir.join("bull_boxes.parquet"))?;
    let mut bull_df = bull_box_frame(&bull)?;
    ParquetWriter::new(&mut bull_file).finish(&mut bull_df)?;

    Ok(())
}
