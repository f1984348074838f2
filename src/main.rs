#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::process::ExitCode;

use beatdrop::app::{App, AppOptions};
use beatdrop::beat::{load_wav, BeatTrack};
use beatdrop::cli::CliArgs;
use beatdrop::config::SessionConfig;
use beatdrop::error::GameResult;
use beatdrop::platform;
use clap::Parser;
use tracing::{error, info};

/// Prints the estimated tempo and every beat of the track.
fn analyze(args: &CliArgs, config: &SessionConfig) -> GameResult<()> {
    let decoded = load_wav(&args.audio)?;
    let track = BeatTrack::extract(&decoded.samples, decoded.sample_rate, config.amplitude_mode)?;

    match track.tempo_bpm() {
        Some(bpm) => println!("Tempo: {bpm:.2} BPM"),
        None => println!("Tempo: unknown"),
    }
    println!("Beats ({}, {} amplitude):", track.len(), config.amplitude_mode);
    for beat in track.iter() {
        println!("{:>10.4}s  {:.4}", beat.time, beat.amplitude);
    }

    Ok(())
}

fn play(args: CliArgs, config: SessionConfig) -> GameResult<()> {
    let options = AppOptions {
        audio: args.audio,
        frames: args.frames.unwrap_or_default(),
        fps: args.fps,
        font: args.font,
        seed: args.seed,
        config,
    };

    let mut app = App::new(options)?;
    info!("Starting game loop");
    while app.run() {}

    println!("{}", app.summary());
    Ok(())
}

/// The main entry point of the application.
///
/// Parses the command line, then either analyzes the audio track or plays a session and prints
/// its summary.
pub fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = match args.session_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = platform::init_tracing(args.verbose) {
        eprintln!("{e}");
    }

    let result = if args.analyze {
        analyze(&args, &config)
    } else {
        play(args, config)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
