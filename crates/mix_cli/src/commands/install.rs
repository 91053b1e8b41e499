//! Install command - Fetch a mixin, generate it and optionally push its rules.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mix_mixer::{Evaluator, JsonnetEvaluator};
use mix_registry::{
    CatalogClient, InstallOptions, Installer, JsonnetBundler, PushClient, DEFAULT_BIND_ADDRESS,
    DEFAULT_CATALOG_URL, DEFAULT_JB_PROGRAM,
};

use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Catalog name or URL of the mixin
    reference: String,

    /// Directory the mixin is downloaded into
    #[arg(short, long)]
    directory: PathBuf,

    /// Output directory for generated artifacts (default out)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Push generated rules and alerts after installing
    #[arg(long)]
    put: bool,

    /// Address of the rule-management server
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind_address: String,

    /// Mixin catalog location
    #[arg(long, env = "MIXTOOL_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    /// jsonnet-bundler program
    #[arg(long, env = "MIXTOOL_JB", default_value = DEFAULT_JB_PROGRAM)]
    jb: String,

    /// Evaluator program
    #[arg(long, env = "MIXTOOL_JSONNET")]
    jsonnet: Option<String>,
}

pub async fn execute(args: InstallArgs, settings: &Settings) -> Result<()> {
    info!("Installing mixin: {}", args.reference);

    // Validate the push target before downloading anything.
    let push_client = if args.put {
        Some(PushClient::new(&args.bind_address)?)
    } else {
        None
    };

    let url = CatalogClient::new(&args.catalog_url)
        .resolve(&args.reference)
        .await
        .with_context(|| format!("Failed to resolve mixin {}", args.reference))?;

    let program = settings.jsonnet(args.jsonnet.clone());
    let ext_vars = settings.ext_vars(Vec::new());
    let installer = Installer::new(
        Arc::new(JsonnetBundler::new().with_program(&args.jb)),
        move |jpath| {
            Arc::new(
                JsonnetEvaluator::new(jpath)
                    .with_program(program.clone())
                    .with_ext_vars(ext_vars.clone()),
            ) as Arc<dyn Evaluator>
        },
    );

    let options = InstallOptions::new(&args.directory).output(settings.output(args.output.clone()));
    let report = installer
        .install(&url, &options)
        .await
        .with_context(|| format!("Failed to install {}", url))?;

    println!("✅ Installed {}", url);
    println!("   📄 Entry file: {}", report.import_path.display());
    for destination in report.written.destinations() {
        println!("   📁 {}", options.output.join(destination.to_string()).display());
    }

    if let Some(client) = push_client {
        installer
            .push(&report, &client)
            .await
            .with_context(|| format!("Failed to push rules to {}", client.endpoint()))?;
        println!("🚀 Pushed {} rule file(s) to {}", report.rules_alerts.len(), client.endpoint());
    }

    Ok(())
}
