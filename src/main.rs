mod horizon;
mod predict;
mod tracker;
mod web;

use std::fs;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::horizon::{upcoming_passes, LookAngleSample, Pass};
use crate::predict::sun::{sun_conjunction, sun_track};
use crate::predict::{parse_tle_sets, Observer, SatelliteOracle};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "passcast")]
#[command(about = "Satellite pass prediction and tracking service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web service
    Serve {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Print the upcoming passes for every satellite in a TLE file
    Passes {
        /// TLE file holding 2- or 3-line element sets
        tle: String,
        /// Observer location as "lat, lon" in decimal degrees
        #[arg(long)]
        coordinates: String,
        /// Observer altitude above sea level, meters
        #[arg(long, default_value_t = 0.0)]
        altitude_m: f64,
        /// Search horizon, e.g. "24h" or "7d"
        #[arg(long, default_value = "7d")]
        horizon: String,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse a TLE file and list its satellites
    Validate { tle: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Passes {
            tle,
            coordinates,
            altitude_m,
            horizon,
            json,
        } => passes(&tle, &coordinates, altitude_m, &horizon, json),
        Commands::Validate { tle } => validate(&tle),
    }
}

async fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = web::run_server(config).await {
        eprintln!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[derive(Serialize)]
struct PassReport {
    satellite: String,
    sun_conflict: bool,
    #[serde(flatten)]
    pass: Pass,
}

fn passes(
    tle_path: &str,
    coordinates: &str,
    altitude_m: f64,
    horizon: &str,
    json: bool,
) -> ExitCode {
    let Some(observer) = Observer::from_coordinates(coordinates, Some(altitude_m)) else {
        eprintln!("Invalid coordinates: expected \"lat, lon\" in decimal degrees");
        return ExitCode::FAILURE;
    };

    let window = match humantime::parse_duration(horizon)
        .map_err(|e| e.to_string())
        .and_then(|d| chrono::Duration::from_std(d).map_err(|e| e.to_string()))
    {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Invalid horizon: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let content = match fs::read_to_string(tle_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sets = parse_tle_sets(&content);
    if sets.is_empty() {
        eprintln!("No TLE sets found in {}", tle_path);
        return ExitCode::FAILURE;
    }

    let start = Utc::now();
    let mut reports = Vec::new();
    for (name, line1, line2) in sets {
        let elements =
            match sgp4::Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes()) {
                Ok(elements) => elements,
                Err(e) => {
                    log::warn!("skipping invalid TLE set: {}", e);
                    continue;
                }
            };
        let satellite = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        let oracle = match SatelliteOracle::new(observer, elements) {
            Ok(oracle) => oracle,
            Err(e) => {
                log::warn!("skipping {}: {}", satellite, e);
                continue;
            }
        };

        for pass in upcoming_passes(&oracle, start, window) {
            let sun = sun_track(&observer, &pass.track);
            reports.push(PassReport {
                satellite: satellite.clone(),
                sun_conflict: sun_conjunction(&pass.track, &sun),
                pass,
            });
        }
    }

    reports.sort_by_key(|r| r.pass.aos.map(|aos| aos.time));

    if json {
        return match serde_json::to_string_pretty(&reports) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error encoding output: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if reports.is_empty() {
        println!("No passes within the search horizon");
        return ExitCode::SUCCESS;
    }

    for report in &reports {
        let sun_note = if report.sun_conflict {
            "  [near sun]"
        } else {
            ""
        };
        println!(
            "{}  AOS {}  LOS {}  MAX {}{}",
            report.satellite,
            format_event(report.pass.aos),
            format_event(report.pass.los),
            format_peak(&report.pass.peak),
            sun_note
        );
    }
    ExitCode::SUCCESS
}

fn validate(tle_path: &str) -> ExitCode {
    let content = match fs::read_to_string(tle_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sets = parse_tle_sets(&content);
    if sets.is_empty() {
        eprintln!("No TLE sets found in {}", tle_path);
        return ExitCode::FAILURE;
    }

    let mut ok = true;
    println!("{} TLE set(s)", sets.len());
    for (i, (name, line1, line2)) in sets.into_iter().enumerate() {
        match sgp4::Elements::from_tle(name, line1.as_bytes(), line2.as_bytes()) {
            Ok(elements) => {
                let label = elements
                    .object_name
                    .clone()
                    .unwrap_or_else(|| "(unnamed)".to_string());
                println!("  {}: {} (NORAD {})", i + 1, label, elements.norad_id);
            }
            Err(e) => {
                eprintln!("  {}: parse error: {}", i + 1, e);
                ok = false;
            }
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_event(sample: Option<LookAngleSample>) -> String {
    match sample {
        Some(s) => format!("{} Az {:5.1}°", format_time(s.time), s.azimuth_deg),
        None => "not within limit".to_string(),
    }
}

fn format_peak(peak: &LookAngleSample) -> String {
    format!(
        "{} Az {:5.1}° El {:4.1}°",
        format_time(peak.time),
        peak.azimuth_deg,
        peak.elevation_deg
    )
}
