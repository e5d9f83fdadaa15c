//! ffmpeg-transformer command line interface
//!
//! Prints ffmpeg command lines computed from media profiles. Nothing is
//! executed.

use clap::{Parser, Subcommand};
use ffmpeg_transformer::{CommandTransformer, MediaProfile, ProfileTransformer};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffmpeg-transformer")]
#[command(about = "Build ffmpeg command lines from media profiles", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the transformation from a source to a target profile and print the command
    Plan {
        /// Profile of the input media (JSON)
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        /// Desired profile (JSON)
        #[arg(long, value_name = "FILE")]
        target: PathBuf,

        /// Input media file
        #[arg(short, long, value_name = "FILE")]
        input: String,

        /// Output media file
        #[arg(short, long, value_name = "FILE")]
        output: String,

        /// Re-encode video even when it could be copied
        #[arg(long)]
        force_video: bool,

        /// Re-encode audio even when it could be copied
        #[arg(long)]
        force_audio: bool,
    },

    /// Print the command for a ready transformation profile
    Apply {
        /// Transformation profile (JSON)
        #[arg(long, value_name = "FILE")]
        profile: PathBuf,

        /// Input media file
        #[arg(short, long, value_name = "FILE")]
        input: String,

        /// Output media file
        #[arg(short, long, value_name = "FILE")]
        output: String,
    },

    /// Build a media profile from ffprobe JSON output
    Profile {
        /// Output of `ffprobe -show_format -show_streams -of json`
        #[arg(long, value_name = "FILE")]
        probe: PathBuf,

        /// Probed media file, used to recover its size
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("ffmpeg-transformer {}", ffmpeg_transformer::VERSION);

    match cli.command {
        Commands::Plan {
            source,
            target,
            input,
            output,
            force_video,
            force_audio,
        } => {
            let source = MediaProfile::load(&source)?;
            let target = MediaProfile::load(&target)?;

            let transformation =
                ProfileTransformer::new().transform_media(&source, &target, force_video, force_audio);
            debug!("Transformation: {}", transformation.to_json()?);

            let mut command =
                CommandTransformer::new().apply_transformation(&transformation, &input, &output)?;
            println!("ffmpeg {}", command.to_shell_string()?);
        }
        Commands::Apply {
            profile,
            input,
            output,
        } => {
            let transformation = MediaProfile::load(&profile)?;

            let mut command =
                CommandTransformer::new().apply_transformation(&transformation, &input, &output)?;
            println!("ffmpeg {}", command.to_shell_string()?);
        }
        Commands::Profile { probe, file } => {
            let json = fs::read_to_string(&probe)?;
            let profile = MediaProfile::from_probe_json(&json, file.as_deref())?;
            println!("{}", profile.to_json()?);
        }
    }

    Ok(())
}
