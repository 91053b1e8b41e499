//! Generate command - Evaluate a local mixin and write its artifacts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Subcommand};
use tracing::{debug, info};

use mix_mixer::{
    available_vendor, generate_all, generate_dashboards, generate_rules_alerts, DestinationMap,
    Formatter, GenerateConfig, GenerateRequest, GenerationMode, JsonnetEvaluator, OutputRouter,
    DASHBOARDS_DIR,
};

use crate::settings::Settings;

#[derive(Subcommand)]
pub enum GenerateCommand {
    /// Generate alerting rules
    Alerts(GenerateArgs),

    /// Generate recording rules
    Rules(GenerateArgs),

    /// Generate one file per dashboard
    Dashboards(GenerateArgs),

    /// Generate rules, alerts and dashboards
    All(GenerateArgs),
}

/// Flags shared by every generate subcommand.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Mixin entry file
    file: PathBuf,

    /// Add a directory to the import search path
    #[arg(short = 'J', long = "jpath", env = "MIXTOOL_JPATH", value_delimiter = ':')]
    jpath: Vec<PathBuf>,

    /// Convert output to YAML (the default)
    #[arg(short, long, action = ArgAction::SetTrue, overrides_with = "no_yaml")]
    yaml: bool,

    /// Keep output as JSON
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "yaml")]
    no_yaml: bool,

    /// Data sources to generate for, in merge order
    #[arg(short = 's', long = "data-sources", value_delimiter = ',')]
    data_sources: Vec<String>,

    /// Output directory (default out)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Destination file suffix; `-` or `stdout` streams to standard output
    #[arg(short, long)]
    pattern: Option<String>,

    /// Evaluator program
    #[arg(long, env = "MIXTOOL_JSONNET")]
    jsonnet: Option<String>,

    /// Extension variable passed to the evaluator
    #[arg(long = "ext-str", value_name = "KEY=VALUE", value_parser = parse_ext_var)]
    ext_str: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Alerts,
    Rules,
    Dashboards,
    All,
}

impl ArtifactKind {
    fn default_pattern(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Alerts => Some("alerts"),
            ArtifactKind::Rules => Some("rules"),
            ArtifactKind::All => Some("rules-alerts"),
            ArtifactKind::Dashboards => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ArtifactKind::Alerts => "alerts",
            ArtifactKind::Rules => "rules",
            ArtifactKind::Dashboards => "dashboards",
            ArtifactKind::All => "all artifacts",
        }
    }
}

impl GenerateCommand {
    fn into_parts(self) -> (ArtifactKind, GenerateArgs) {
        match self {
            GenerateCommand::Alerts(args) => (ArtifactKind::Alerts, args),
            GenerateCommand::Rules(args) => (ArtifactKind::Rules, args),
            GenerateCommand::Dashboards(args) => (ArtifactKind::Dashboards, args),
            GenerateCommand::All(args) => (ArtifactKind::All, args),
        }
    }
}

impl GenerateArgs {
    fn request(&self, kind: ArtifactKind, settings: &Settings) -> GenerateRequest {
        let mut request = GenerateRequest::new(&self.file)
            .directory(settings.output(self.directory.clone()))
            .data_sources(settings.data_sources(self.data_sources.clone()))
            .formatter(Formatter::from_yaml_flag(settings.yaml(self.yaml_flag())));

        if let Some(pattern) = self.pattern.as_deref().or(kind.default_pattern()) {
            request = request.pattern(pattern);
        }
        request
    }

    /// `None` when neither flag is given, so the settings file can decide.
    fn yaml_flag(&self) -> Option<bool> {
        match (self.yaml, self.no_yaml) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn evaluator(&self, settings: &Settings) -> Result<JsonnetEvaluator> {
        let jpath = available_vendor(&self.file, settings.jpath(self.jpath.clone()))?;
        Ok(JsonnetEvaluator::new(jpath)
            .with_program(settings.jsonnet(self.jsonnet.clone()))
            .with_ext_vars(settings.ext_vars(self.ext_str.clone())))
    }
}

pub async fn execute(command: GenerateCommand, settings: &Settings) -> Result<()> {
    let (kind, args) = command.into_parts();
    info!("Generating {} from {:?}", kind.label(), args.file);

    if !args.file.is_file() {
        anyhow::bail!("Mixin file not found: {:?}", args.file);
    }

    let evaluator = args.evaluator(settings)?;
    debug!("Import search path: {:?}", evaluator.jpath());
    let config = args.request(kind, settings).build(Arc::new(evaluator));

    let mixed = run(kind, &config)
        .await
        .with_context(|| format!("Failed to generate {} from {:?}", kind.label(), args.file))?;

    OutputRouter::new(&config.directory)
        .write(&mixed)
        .with_context(|| format!("Failed to write output to {:?}", config.directory))?;

    info!("Generated {} artifact(s)", mixed.len());
    Ok(())
}

async fn run(kind: ArtifactKind, config: &GenerateConfig) -> mix_mixer::MixerResult<DestinationMap> {
    match kind {
        ArtifactKind::Alerts => generate_rules_alerts(&config.rules_alerts, GenerationMode::Alerts).await,
        ArtifactKind::Rules => generate_rules_alerts(&config.rules_alerts, GenerationMode::Rules).await,
        ArtifactKind::Dashboards => Ok(generate_dashboards(&config.dashboards)
            .await?
            .nest_under(DASHBOARDS_DIR)),
        ArtifactKind::All => generate_all(config).await,
    }
}

fn parse_ext_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
