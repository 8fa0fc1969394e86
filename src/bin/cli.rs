//! Command-line interface for season_colors
//!
//! Diagnoses one photo and prints the season label, or the full report as
//! JSON. The input file is removed after the run, as in library use.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use season_colors::{diagnose, DiagnosisConfig};

#[derive(Parser, Debug)]
#[command(name = "season-colors")]
#[command(version, about = "Personal-color season diagnosis", long_about = None)]
struct Args {
    /// Input photo (removed after the run)
    #[arg(required = true)]
    image: PathBuf,

    /// Configuration file (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the palette strip image to this path
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Print the full diagnosis as JSON instead of the label
    #[arg(short, long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match DiagnosisConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to read config {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => DiagnosisConfig::default(),
    };
    if args.palette.is_some() {
        config.palette_output = args.palette.clone();
    }

    match diagnose(&args.image, &config) {
        Ok(diagnosis) => {
            if args.json {
                match serde_json::to_string_pretty(&diagnosis) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error serializing result: {e}");
                        println!("{}", diagnosis.season);
                    }
                }
            } else {
                println!("{}", diagnosis.season);
            }

            eprintln!();
            eprintln!("Diagnosis Summary:");
            eprintln!("  Season: {}", diagnosis.season);
            eprintln!("  Undertone: {:?}", diagnosis.undertone);
            eprintln!(
                "  Palette: {}",
                diagnosis
                    .palette
                    .iter()
                    .map(|s| s.hex.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            eprintln!("  Contrast: {:.5}", diagnosis.features.contrast);
        }
        Err(error) => {
            eprintln!("Diagnosis failed: {error}");
            eprintln!("Suggestion: {}", error.user_message());
            process::exit(1);
        }
    }
}
