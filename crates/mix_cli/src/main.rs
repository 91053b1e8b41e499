//! mixtool CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or unknown mixin
//! - 3: Evaluation or format failure
//! - 4: Catalog or dependency fetch failure
//! - 5: Push failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mix_mixer::MixerError;
use mix_registry::RegistryError;

mod commands;
mod settings;

use commands::{Cli, Commands};
use settings::Settings;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const EVALUATION_FAILURE: u8 = 3;
    pub const REGISTRY_ERROR: u8 = 4;
    pub const PUSH_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, stdout is reserved for streamed artifacts.
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(log_filter(cli.verbose, cli.quiet))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(command) => commands::generate::execute(command, &settings).await,
        Commands::Install(args) => commands::install::execute(args, &settings).await,
        Commands::List(args) => commands::list::execute(args).await,
    }
}

/// `RUST_LOG` wins when set, otherwise the verbosity flags pick the level.
fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)))
}

fn default_directives(verbose: bool, quiet: bool) -> String {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    format!("warn,mixtool={level},mix_mixer={level},mix_registry={level}")
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<MixerError>() {
            return mixer_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<RegistryError>() {
            return registry_exit_code(err);
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("not found") || msg.contains("argument") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

fn mixer_exit_code(err: &MixerError) -> u8 {
    match err {
        MixerError::Evaluation(_)
        | MixerError::EvaluatorUnavailable { .. }
        | MixerError::Format(_)
        | MixerError::Decode(_)
        | MixerError::InvalidDashboardName(_) => ExitCodes::EVALUATION_FAILURE,
        MixerError::Io(_) => ExitCodes::GENERAL_ERROR,
    }
}

fn registry_exit_code(err: &RegistryError) -> u8 {
    match err {
        RegistryError::NotFound(_) | RegistryError::InvalidUrl { .. } => ExitCodes::INVALID_ARGS,
        RegistryError::CatalogFetch { .. }
        | RegistryError::CatalogDecode(_)
        | RegistryError::NotExist(_)
        | RegistryError::Fetch(_) => ExitCodes::REGISTRY_ERROR,
        RegistryError::Push { .. } | RegistryError::Http(_) => ExitCodes::PUSH_ERROR,
        RegistryError::Mixer(inner) => mixer_exit_code(inner),
        RegistryError::Io(_) => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(false, false),
            "warn,mixtool=info,mix_mixer=info,mix_registry=info"
        );
        assert!(default_directives(true, false).contains("mixtool=debug"));
        assert!(default_directives(false, true).contains("mix_mixer=warn"));
    }

    #[test]
    fn test_categorize_typed_errors() {
        let err = anyhow::Error::new(MixerError::Evaluation("boom".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::EVALUATION_FAILURE);

        let err = anyhow::Error::new(RegistryError::NotFound("foo".to_string()))
            .context("Failed to resolve mixin foo");
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let err = anyhow::Error::new(RegistryError::Push {
            status: 500,
            body: "down".to_string(),
        });
        assert_eq!(categorize_error(&err), ExitCodes::PUSH_ERROR);

        let err = anyhow::Error::new(RegistryError::Fetch("jb failed".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::REGISTRY_ERROR);
    }

    #[test]
    fn test_categorize_wrapped_mixer_error() {
        let err = anyhow::Error::new(RegistryError::Mixer(MixerError::Format("bad".to_string())));
        assert_eq!(categorize_error(&err), ExitCodes::EVALUATION_FAILURE);
    }

    #[test]
    fn test_categorize_context_and_untyped() {
        let err: anyhow::Result<()> =
            Err(MixerError::Format("not structured data".to_string())).context("Failed to generate alerts");
        assert_eq!(categorize_error(&err.unwrap_err()), ExitCodes::EVALUATION_FAILURE);

        let err = anyhow::anyhow!("Mixin file not found: \"x\"");
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
