use std::fs;
use std::path::PathBuf;

use boxrange::{
    BoxProfileConfig, CycleAnalysisEngine, CycleDataLoader, init_logging, write_box_tables,
};
use export::build_payload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: {} <cycles.csv|cycles.json> [output_json] [profile_yaml] [parquet_dir]",
            args[0]
        );
        std::process::exit(2);
    }

    init_logging();

    let data_path = PathBuf::from(&args[1]);
    let output = if args.len() >= 3 {
        PathBuf::from(&args[2])
    } else {
        PathBuf::from("cycle_boxes.json")
    };
    let profile = if args.len() >= 4 {
        BoxProfileConfig::from_yaml_file(&args[3])?
    } else {
        BoxProfileConfig::default()
    };

    let cycles = CycleDataLoader::load(&data_path)?;
    let engine = CycleAnalysisEngine::new(profile);
    let payload = build_payload(&engine, &cycles, true);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, serde_json::to_vec_pretty(&payload)?)?;

    if args.len() >= 5 {
        write_box_tables(&payload.cycles, &args[4])?;
    }

    let bear_boxes: usize = payload.cycles.iter().map(|x| x.bear.boxes.len()).sum();
    let bull_boxes: usize = payload.cycles.iter().map(|x| x.bull.boxes.len()).sum();
    println!(
        "exported {} cycles ({} bear boxes, {} bull boxes) -> {}",
        payload.cycles.len(),
        bear_boxes,
        bull_boxes,
        output.display()
    );

    Ok(())
}
