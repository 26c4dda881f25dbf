use std::path::PathBuf;

use bevy::log::{info, warn};
use clap::{Parser, ValueEnum};
use paddle::WavePreset;
use sim::{load_scenario, run, Scenario, SimSettings};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Still,
    Calm,
    Lake,
    Ocean,
    Storm,
}

impl From<Preset> for WavePreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Still => WavePreset::Still,
            Preset::Calm => WavePreset::Calm,
            Preset::Lake => WavePreset::Lake,
            Preset::Ocean => WavePreset::Ocean,
            Preset::Storm => WavePreset::Storm,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Headless kayak paddling scenario", long_about = None)]
struct Args {
    /// RON scenario file; built-in defaults are used when omitted or missing
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Simulated seconds
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    #[arg(long, default_value_t = 50.0)]
    fixed_hz: f64,

    #[arg(long, default_value_t = 60.0)]
    frame_hz: f64,

    /// Seed for the hand tracking noise
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Override the scenario's wave preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,
}

fn main() {
    let args = Args::parse();

    if args.fixed_hz <= 0.0 || args.frame_hz <= 0.0 {
        eprintln!("Error: --fixed-hz and --frame-hz must be positive.");
        eprintln!("Got: {} and {}", args.fixed_hz, args.frame_hz);
        std::process::exit(1);
    }

    let mut scenario = match &args.scenario {
        Some(path) => match load_scenario(path) {
            Ok(scenario) => scenario,
            Err(err) => {
                eprintln!("Failed to load scenario {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => Scenario::default(),
    };

    if let Some(preset) = args.preset {
        scenario.waves = preset.into();
    }

    let report = run(
        scenario,
        SimSettings {
            seconds: args.seconds.max(0.0),
            fixed_hz: args.fixed_hz,
            frame_hz: args.frame_hz,
            seed: args.seed,
        },
        true,
    );

    if report.strokes == [0, 0] {
        warn!("No blade ever entered the water");
    }
    info!("{report}");
}
