//! Voxshift - video accent conversion CLI tool.
//!
//! This crate splits a video's audio track into chunks, converts them in
//! parallel through an external RVC voice model, and remuxes the result.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod convert;
pub mod download;
pub mod error;
pub mod media;
pub mod output;
pub mod pipeline;

use clap::Parser;
use cli::{Cli, Command, ConvertArgs};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_config,
    validate_pipeline,
};
use constants::DEFAULT_OUTPUT_FILE;
use output::{ConsoleReporter, NullReporter, ProgressReporter};
use pipeline::{JobOptions, run_job};
use std::path::PathBuf;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for voxshift CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.convert.verbose, cli.convert.quiet);

    // Remove scratch workspaces on interrupt
    if let Err(e) = ctrlc::set_handler(|| {
        pipeline::cleanup_all_workspaces();
        std::process::exit(130); // 128 + SIGINT(2)
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let config = load_default_config()?;

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    let Some(source) = cli.source else {
        cli::help::print_usage_hint(&config);
        return Ok(());
    };

    validate_config(&config)?;
    convert_source(&source, &cli.convert, &config)
}

/// Resolve job options and run one conversion.
fn convert_source(source: &str, args: &ConvertArgs, config: &Config) -> Result<()> {
    let options = resolve_options(args, config)?;

    info!(
        "Converting {source} with {} voice ({}s chunks, {} worker(s))",
        options.voice, options.chunk_secs, options.workers
    );

    let progress_enabled = !args.quiet && !args.no_progress;
    let console;
    let reporter: &dyn ProgressReporter = if args.quiet {
        &NullReporter
    } else {
        console = ConsoleReporter::new(progress_enabled);
        &console
    };

    run_job(config, source, &options, reporter)?;
    Ok(())
}

/// CLI flag > env var > config file > default.
fn resolve_options(args: &ConvertArgs, config: &Config) -> Result<JobOptions> {
    let options = JobOptions {
        voice: args.voice.unwrap_or(config.pipeline.voice),
        chunk_secs: args.chunk_secs.unwrap_or(config.pipeline.chunk_secs),
        workers: args.workers.unwrap_or(config.pipeline.workers),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
        keep_scratch: args.keep_scratch,
    };
    validate_pipeline(options.chunk_secs, options.workers)?;
    Ok(options)
}

/// Initialize tracing subscriber based on verbosity.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_command(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
        Command::Voices => {
            println!("Voice models:");
            for voice in [config::Voice::Male, config::Voice::Female] {
                let model = config.voices.lookup(voice);
                let default_marker = if voice == config.pipeline.voice {
                    " [default]"
                } else {
                    ""
                };
                println!(
                    "  {voice}: {} (index: {}){default_marker}",
                    model.model,
                    model.index.display()
                );
            }
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nEdit [converter] and [voices] to point at your RVC install.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let contents =
                toml::to_string_pretty(&config).map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use config::Voice;

    fn args(argv: &[&str]) -> ConvertArgs {
        Cli::try_parse_from(argv).unwrap().convert
    }

    #[test]
    fn test_resolve_options_uses_config_defaults() {
        let mut config = Config::default();
        config.pipeline.voice = Voice::Female;
        config.pipeline.workers = 6;

        let options = resolve_options(&args(&["voxshift", "a.mp4"]), &config).unwrap();
        assert_eq!(options.voice, Voice::Female);
        assert_eq!(options.workers, 6);
        assert_eq!(options.chunk_secs, 300.0);
        assert_eq!(options.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
    }

    #[test]
    fn test_resolve_options_flags_override_config() {
        let config = Config::default();
        let options = resolve_options(
            &args(&["voxshift", "a.mp4", "--voice", "female", "-w", "2", "-o", "x.mp4"]),
            &config,
        )
        .unwrap();
        assert_eq!(options.voice, Voice::Female);
        assert_eq!(options.workers, 2);
        assert_eq!(options.output, PathBuf::from("x.mp4"));
    }

    #[test]
    fn test_resolve_options_rejects_bad_config_values() {
        let mut config = Config::default();
        config.pipeline.workers = 0;
        let result = resolve_options(&args(&["voxshift", "a.mp4"]), &config);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }
}
