//! Installing a mixin: fetch, locate, generate, write and optionally push.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mix_mixer::{
    generate_dashboards, generate_rules_alerts, DataSource, DestinationMap, Evaluator, Formatter,
    GenerateRequest, GenerationMode, OutputRouter, DASHBOARDS_DIR, DEFAULT_OUTPUT_DIR,
};
use tracing::info;

use crate::error::RegistryResult;
use crate::fetch::{DependencyFetcher, DEFAULT_JSONNET_HOME};
use crate::locate::locate_import_file;
use crate::push::PushClient;

/// Destination suffix of installed rules and alerts.
pub const INSTALL_PATTERN: &str = "rules-alerts";

/// Where and how a mixin is installed.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory the mixin is downloaded into.
    pub directory: PathBuf,
    /// Package directory, relative to `directory`.
    pub jsonnet_home: String,
    /// Directory generated artifacts are written to.
    pub output: PathBuf,
}

impl InstallOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            jsonnet_home: DEFAULT_JSONNET_HOME.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.directory.join(&self.jsonnet_home)
    }
}

/// Outcome of an installation.
#[derive(Debug)]
pub struct InstallReport {
    pub import_path: PathBuf,
    /// Everything written to the output directory.
    pub written: DestinationMap,
    /// The rules and alerts subset, ready to push.
    pub rules_alerts: DestinationMap,
}

/// Installs mixins with a pluggable fetcher and evaluator.
pub struct Installer {
    fetcher: Arc<dyn DependencyFetcher>,
    evaluator_factory: Box<dyn Fn(Vec<PathBuf>) -> Arc<dyn Evaluator> + Send + Sync>,
}

impl Installer {
    /// `evaluator_factory` receives the import search path of the fetched tree.
    pub fn new<F>(fetcher: Arc<dyn DependencyFetcher>, evaluator_factory: F) -> Self
    where
        F: Fn(Vec<PathBuf>) -> Arc<dyn Evaluator> + Send + Sync + 'static,
    {
        Self {
            fetcher,
            evaluator_factory: Box::new(evaluator_factory),
        }
    }

    /// Install the mixin at `mixin_url` and generate its artifacts.
    pub async fn install(
        &self,
        mixin_url: &str,
        options: &InstallOptions,
    ) -> RegistryResult<InstallReport> {
        ensure_dir(&options.directory)?;

        self.fetcher
            .fetch(mixin_url, &options.jsonnet_home, &options.directory)
            .await?;

        let vendor = options.vendor_dir();
        let import_path = locate_import_file(&vendor, mixin_url)?;
        info!("Installed {} at {:?}", mixin_url, import_path);

        let evaluator = (self.evaluator_factory)(vec![vendor]);
        let config = GenerateRequest::new(&import_path)
            .directory(&options.output)
            .data_sources(DataSource::ALL.iter().map(|ds| ds.as_str()))
            .pattern(INSTALL_PATTERN)
            .formatter(Formatter::Yaml)
            .build(evaluator);

        let rules_alerts =
            generate_rules_alerts(&config.rules_alerts, GenerationMode::RulesAndAlerts).await?;
        let dashboards = generate_dashboards(&config.dashboards).await?;

        let mut written = rules_alerts.clone();
        written.merge(dashboards.nest_under(DASHBOARDS_DIR));
        OutputRouter::new(&config.directory).write(&written)?;

        Ok(InstallReport {
            import_path,
            written,
            rules_alerts,
        })
    }

    /// Push the rules and alerts of an installation.
    pub async fn push(&self, report: &InstallReport, client: &PushClient) -> RegistryResult<()> {
        client.push_all(&report.rules_alerts).await
    }
}

fn ensure_dir(directory: &Path) -> RegistryResult<()> {
    if !directory.exists() {
        std::fs::create_dir_all(directory)?;
    }
    Ok(())
}
