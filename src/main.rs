//! Impulse Capture CLI
//!
//! Command-line interface for generating excitation signals and encoding
//! captured responses.

use clap::Parser;
use env_logger::Env;
use log::info;

use impulse_capture::cli::{commands, Cli, Commands};
use impulse_capture::config::CaptureConfig;
use impulse_capture::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    info!("Impulse Capture v{}", env!("CARGO_PKG_VERSION"));

    let config = CaptureConfig::load_or_default(cli.config.as_deref())?;
    handle_command(cli.command, config)
}

fn handle_command(cmd: Commands, config: CaptureConfig) -> Result<()> {
    match cmd {
        Commands::Generate {
            signal,
            duration,
            level,
            sample_rate,
            seed,
            bake_level,
            output,
        } => {
            let config = CaptureConfig {
                signal_type: signal.unwrap_or(config.signal_type),
                duration_secs: duration.unwrap_or(config.duration_secs),
                level_dbfs: level.unwrap_or(config.level_dbfs),
                sample_rate: sample_rate.unwrap_or(config.sample_rate),
                seed: seed.or(config.seed),
                ..config
            };
            commands::generate(&config, bake_level, output.as_deref()).map(|_| ())
        }
        Commands::Encode {
            input,
            sample_rate,
            channels,
            signal,
            normalize,
            output,
        } => {
            let config = CaptureConfig {
                sample_rate: sample_rate.unwrap_or(config.sample_rate),
                signal_type: signal.unwrap_or(config.signal_type),
                ..config
            };
            commands::encode(&config, &input, channels, normalize, output.as_deref()).map(|_| ())
        }
        Commands::Import {
            input,
            signal,
            normalize,
            output,
        } => {
            let config = CaptureConfig {
                signal_type: signal.unwrap_or(config.signal_type),
                ..config
            };
            commands::import(&config, &input, normalize, output.as_deref()).map(|_| ())
        }
        Commands::Levels { input, overview } => commands::levels(&input, overview).map(|_| ()),
    }
}
