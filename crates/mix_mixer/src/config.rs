//! Generation request configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::destination::{Destination, DestinationPattern};
use crate::error::MixerResult;
use crate::eval::Evaluator;
use crate::format::Formatter;
use crate::mixin::{DashboardsOptions, DataSource, Mixin, RulesAlertsOptions};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Subdirectory of the output directory holding dashboards.
pub const DASHBOARDS_DIR: &str = "dashboards";

/// Data sources requested when none are given.
pub fn default_data_sources() -> Vec<String> {
    DataSource::ALL.iter().map(|ds| ds.as_str().to_string()).collect()
}

/// Binds an evaluator to generation requests.
///
/// One evaluator can be shared by every request using the same search path.
#[derive(Clone)]
pub struct GeneratorOptions {
    pub evaluator: Arc<dyn Evaluator>,
}

impl GeneratorOptions {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self { evaluator }
    }

    /// Evaluate a snippet with the bound evaluator.
    pub async fn evaluate(&self, snippet: &Mixin) -> MixerResult<Mixin> {
        let out = self.evaluator.exec(snippet).await?;
        Ok(Mixin::from(out))
    }
}

impl std::fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorOptions").finish_non_exhaustive()
    }
}

/// One backend's rules/alerts artifact.
#[derive(Debug, Clone)]
pub struct RulesAlertsTarget {
    pub destination: Destination,
    pub options: RulesAlertsOptions,
    pub generator: GeneratorOptions,
    pub formatter: Formatter,
}

/// The dashboards artifact set.
#[derive(Debug, Clone)]
pub struct DashboardsTarget {
    pub options: DashboardsOptions,
    pub generator: GeneratorOptions,
    pub formatter: Formatter,
}

/// Fully resolved generation configuration for one invocation.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub directory: PathBuf,
    pub rules_alerts: Vec<RulesAlertsTarget>,
    pub dashboards: DashboardsTarget,
}

/// User level generation parameters.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub import_path: PathBuf,
    pub directory: PathBuf,
    /// Backend names in the order their artifacts are merged.
    pub data_sources: Vec<String>,
    /// Destination file suffix; `None`, empty, `-` or `stdout` stream to stdout.
    pub pattern: Option<String>,
    pub formatter: Formatter,
}

impl GenerateRequest {
    pub fn new(import_path: impl Into<PathBuf>) -> Self {
        Self {
            import_path: import_path.into(),
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            data_sources: default_data_sources(),
            pattern: None,
            formatter: Formatter::Yaml,
        }
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn data_sources<I, S>(mut self, data_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_sources = data_sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Resolve the request into targets sharing `evaluator`.
    ///
    /// Unknown data source names are skipped with a warning, never rejected.
    pub fn build(&self, evaluator: Arc<dyn Evaluator>) -> GenerateConfig {
        let generator = GeneratorOptions::new(evaluator);
        let pattern = DestinationPattern::parse(self.pattern.as_deref(), self.formatter);

        let rules_alerts = self
            .data_sources
            .iter()
            .filter_map(|name| match DataSource::from_name(name) {
                Some(data_source) => Some(data_source),
                None => {
                    warn!("Skipping unknown data source '{}'", name);
                    None
                }
            })
            .map(|data_source| RulesAlertsTarget {
                destination: pattern.destination_for(data_source),
                options: RulesAlertsOptions::new(data_source, self.import_path.clone()),
                generator: generator.clone(),
                formatter: self.formatter,
            })
            .collect();

        GenerateConfig {
            directory: self.directory.clone(),
            rules_alerts,
            dashboards: DashboardsTarget {
                options: DashboardsOptions::new(self.import_path.clone()),
                generator,
                formatter: self.formatter,
            },
        }
    }
}
