//! Target Tracker
//!
//! Points a fixed observer at a target whose positions are replayed from a
//! log file, printing every movement and every look angle update.
//!
//! Usage:
//!   cargo run --bin track_target -- --observer 39 -75 4000 path/to/target.log

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use geotracker::{
    GeodeticCoordinate, LogFilePositionSource, PositionInfo, PositionSource, Target, Tracker,
    TrackerConfig, TrackerEvent,
};
use log::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Target Tracker
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tracks a target replayed from a position log and prints look angles",
    long_about = None
)]
struct Args {
    /// Observer position as LAT LON ALT
    #[arg(
        short,
        long,
        num_args = 3,
        required = true,
        allow_negative_numbers = true,
        value_names = ["LAT", "LON", "ALT"]
    )]
    observer: Vec<f64>,

    /// Log file with `<timestamp> <lat> <lon> <alt>` lines for the target
    log_file: PathBuf,

    /// Delay between replayed positions in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// JSON tracker configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn print_event(event: &TrackerEvent, observer: geotracker::EntityId) {
    match event {
        TrackerEvent::PositionChanged { entity, position } => {
            let who = if *entity == observer { "observer" } else { "target" };
            println!("{:>22}: {}", format!("{}'s location", who), position.coordinate);
        }
        TrackerEvent::LookAngleChanged { direction, .. } => {
            println!("     azimuth to target: {:.6}", direction.azimuth);
            println!("   elevation to target: {:.6}", direction.elevation);
        }
        TrackerEvent::TargetChanged { target, .. } => {
            info!("observer now targets {:?}", target);
        }
        _ => {}
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    let here = GeodeticCoordinate::new(args.observer[0], args.observer[1], args.observer[2])
        .map_err(|e| format!("observer - invalid coordinate: {}", e))?;

    let mut tracker = Tracker::with_config(&config);
    let observer = tracker.add_observer();
    let target = tracker.add_entity();
    tracker.add_listener(move |event| print_event(event, observer));

    tracker.set_target(observer, Target::Entity(target))?;
    tracker.set_position(observer, PositionInfo::new(here, Utc::now()))?;

    let mut source = LogFilePositionSource::open(&args.log_file)?;
    if args.interval_ms == 0 {
        let count = tracker.drain_source(target, &mut source)?;
        info!("replayed {} positions", count);
    } else {
        while let Some(position) = source.next_position() {
            println!("========================");
            tracker.set_position(target, position)?;
            thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    if let Some(distance) = tracker.line_of_sight_distance(observer, target)? {
        println!("LoS distance to target: {:.3} m", distance);
    }
    Ok(())
}
