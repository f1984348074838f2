use std::path::PathBuf;

use beatdrop::beat::AmplitudeMode;
use beatdrop::cli::CliArgs;
use beatdrop::config::{FrameOverrunPolicy, SessionConfig};
use beatdrop::error::GameError;
use clap::error::ErrorKind;
use clap::Parser;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(std::iter::once("beatdrop").chain(args.iter().copied()))
}

fn rejection(args: &[&str]) -> ErrorKind {
    match parse(args) {
        Ok(parsed) => panic!("{args:?} should be rejected, parsed {parsed:?}"),
        Err(e) => e.kind(),
    }
}

#[test]
fn test_minimal_arguments() {
    let args = parse(&["song.wav", "frames"]).expect("arguments should parse");

    assert_eq!(args.audio, PathBuf::from("song.wav"));
    assert_eq!(args.frames, Some(PathBuf::from("frames")));
    assert_eq!(args.session_config().expect("defaults are valid"), SessionConfig::default());
    assert_that(&args.analyze).is_false();
    assert_that(&args.seed).is_none();
    assert_that(&args.fps).is_none();
}

#[test]
fn test_all_options() {
    let args = parse(&[
        "--fps",
        "24",
        "song.wav",
        "--interval",
        "0.25",
        "--phase-offset",
        "-0.1",
        "--amplitude",
        "rms",
        "--overrun",
        "loop",
        "frames",
        "--font",
        "font.ttf",
        "--seed",
        "42",
        "-v",
    ])
    .expect("arguments should parse");

    let config = args.session_config().expect("config should be valid");
    assert_eq!(args.fps, Some(24.0));
    assert_eq!(config.note_interval, 0.25);
    assert_eq!(config.phase_offset, -0.1);
    assert_eq!(config.amplitude_mode, AmplitudeMode::Rms);
    assert_eq!(config.overrun_policy, FrameOverrunPolicy::Loop);
    assert_eq!(args.font, Some(PathBuf::from("font.ttf")));
    assert_eq!(args.seed, Some(42));
    assert_that(&args.verbose).is_true();
    assert_eq!(args.frames, Some(PathBuf::from("frames")));
}

#[test]
fn test_policy_aliases() {
    let args = parse(&["song.wav", "frames", "--overrun", "END", "--amplitude", "Peak"]).expect("arguments should parse");

    assert_eq!(args.overrun_policy, FrameOverrunPolicy::EndSession);
    assert_eq!(args.amplitude_mode, AmplitudeMode::Peak);
}

#[test]
fn test_analyze_needs_no_frames() {
    let args = parse(&["song.wav", "--analyze"]).expect("arguments should parse");

    assert_that(&args.analyze).is_true();
    assert_that(&args.frames).is_none();
}

#[test]
fn test_rejects_bad_arguments() {
    assert_eq!(rejection(&[]), ErrorKind::MissingRequiredArgument);
    assert_eq!(rejection(&["song.wav"]), ErrorKind::MissingRequiredArgument);
    assert_eq!(rejection(&["song.wav", "frames", "extra"]), ErrorKind::UnknownArgument);
    assert_eq!(rejection(&["song.wav", "frames", "--bogus"]), ErrorKind::UnknownArgument);
    assert_eq!(rejection(&["song.wav", "frames", "--fps"]), ErrorKind::InvalidValue);
    assert_eq!(rejection(&["song.wav", "frames", "--fps", "0"]), ErrorKind::ValueValidation);
    assert_eq!(rejection(&["song.wav", "frames", "--fps", "fast"]), ErrorKind::ValueValidation);
    assert_eq!(rejection(&["song.wav", "frames", "--overrun", "bounce"]), ErrorKind::ValueValidation);
    assert_eq!(rejection(&["song.wav", "frames", "--amplitude", "loud"]), ErrorKind::ValueValidation);
}

#[test]
fn test_out_of_range_config_is_rejected_after_parsing() {
    let args = parse(&["song.wav", "frames", "--interval=-1"]).expect("arguments should parse");

    assert_that(&matches!(args.session_config(), Err(GameError::InvalidArgument(_)))).is_true();
}

#[test]
fn test_command_definition() {
    use clap::CommandFactory;

    CliArgs::command().debug_assert();
}

#[test]
fn test_overrun_policy_names() {
    assert_eq!("clamp".parse::<FrameOverrunPolicy>(), Ok(FrameOverrunPolicy::Clamp));
    assert_eq!("LOOP".parse::<FrameOverrunPolicy>(), Ok(FrameOverrunPolicy::Loop));
    assert_eq!("end".parse::<FrameOverrunPolicy>(), Ok(FrameOverrunPolicy::EndSession));
    assert_eq!("endsession".parse::<FrameOverrunPolicy>(), Ok(FrameOverrunPolicy::EndSession));
    assert_that(&FrameOverrunPolicy::default()).is_equal_to(FrameOverrunPolicy::Clamp);
}

#[test]
fn test_config_validation() {
    assert_that(&SessionConfig::default().validate().is_ok()).is_true();

    let invalid = [
        SessionConfig {
            note_interval: f64::NAN,
            ..SessionConfig::default()
        },
        SessionConfig {
            onset_stale_after: 0.0,
            ..SessionConfig::default()
        },
        SessionConfig {
            phase_offset: f64::INFINITY,
            ..SessionConfig::default()
        },
        SessionConfig {
            placement_margin: -1.0,
            ..SessionConfig::default()
        },
        SessionConfig {
            placement_attempts: 0,
            ..SessionConfig::default()
        },
    ];
    for config in invalid {
        assert_that(&matches!(config.validate(), Err(GameError::InvalidArgument(_)))).is_true();
    }
}
