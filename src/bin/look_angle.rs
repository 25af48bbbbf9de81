//! Look Angle Calculator
//!
//! Calculates the look angle from an observer to a target. Coordinates are
//! latitude and longitude in decimal degrees and altitude in meters above the
//! WGS84 ellipsoid. The look angle is a line of sight calculation, not the
//! geodetic problem: azimuth is measured in degrees from true north, elevation
//! in degrees from the observer's horizon.
//!
//! Usage:
//!   cargo run --bin look_angle -- 39 -75 4000 39 -76 12000
//!   echo "39 -75 4000 39 -76 12000" | cargo run --bin look_angle
//!   cargo run --bin look_angle -- --interactive

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use geotracker::{EarthModel, GeodeticCoordinate, LookAngleCalculator, TrackerConfig};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Look Angle Calculator
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Calculates azimuth, elevation and line-of-sight distance from an observer to a target",
    long_about = None
)]
struct Args {
    /// Prompt for each coordinate value
    #[arg(short, long, action = ArgAction::SetTrue)]
    interactive: bool,

    /// Use a spherical Earth instead of the WGS84 ellipsoid
    #[arg(short, long, action = ArgAction::SetTrue)]
    spherical: bool,

    /// JSON tracker configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Observer then target, each as LAT LON ALT; read from stdin if omitted
    #[arg(num_args = 0..=6, allow_negative_numbers = true, value_name = "LAT LON ALT")]
    values: Vec<f64>,
}

/// Reads whitespace separated numbers from stdin until `count` are found
fn read_values(count: usize) -> Result<Vec<f64>> {
    let stdin = io::stdin();
    let mut values = Vec::with_capacity(count);
    for line in stdin.lock().lines() {
        for token in line?.split_whitespace() {
            values.push(token.parse::<f64>()?);
            if values.len() == count {
                return Ok(values);
            }
        }
    }
    Err(format!("expected {} numbers, got {}", count, values.len()).into())
}

fn prompt(label: &str) -> Result<f64> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().parse::<f64>()?)
}

fn prompt_coordinate(who: &str) -> Result<[f64; 3]> {
    Ok([
        prompt(&format!("{}'s latitude", who))?,
        prompt(&format!("{}'s longitude", who))?,
        prompt(&format!("{}'s altitude", who))?,
    ])
}

fn coordinate(who: &str, values: &[f64]) -> Result<GeodeticCoordinate> {
    GeodeticCoordinate::new(values[0], values[1], values[2])
        .map_err(|e| format!("{} - invalid coordinate: {}", who, e).into())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    if args.spherical {
        config.earth_model = EarthModel::Spherical;
    }

    let values = if args.interactive {
        let mut values = prompt_coordinate("Observer")?.to_vec();
        values.extend(prompt_coordinate("Target")?);
        values
    } else if args.values.is_empty() {
        read_values(6)?
    } else if args.values.len() == 6 {
        args.values.clone()
    } else {
        return Err("expected six values: observer LAT LON ALT and target LAT LON ALT".into());
    };

    let observer = coordinate("observer", &values[0..3])?;
    let target = coordinate("target", &values[3..6])?;

    let look = LookAngleCalculator::new()
        .with_model(config.earth_model)
        .compute(&observer, &target);
    let observer_ecef = observer.to_geocentric(&config.ellipsoid)?;
    let target_ecef = target.to_geocentric(&config.ellipsoid)?;

    let show = |angle: Option<f64>| match angle {
        Some(degrees) => format!("{:.6}", degrees),
        None => "undefined".to_string(),
    };

    println!("========================");
    println!("   observer's location: {}", observer);
    println!("     target's location: {}", target);
    println!("     azimuth to target: {}", show(look.azimuth));
    println!("   elevation to target: {}", show(look.elevation));
    println!(
        "LoS distance to target: {:.3} m",
        observer_ecef.distance_to(&target_ecef)
    );

    Ok(())
}
