//! # mix_mixer
//!
//! Mixin generation for mixtool.
//!
//! A mixin bundles alerting rules, recording rules and dashboards once for
//! several monitoring backends. This crate turns such a mixin into concrete
//! artifacts:
//!
//! - Section selection by naming convention (`lokiRules`, `prometheusAlerts`, ...)
//! - Evaluation through a pluggable [`Evaluator`]
//! - JSON or YAML formatting
//! - Merging of several backends into one destination-keyed artifact set
//! - Writing artifacts to files or standard output
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mix_mixer::{generate_all, GenerateRequest, JsonnetEvaluator, OutputRouter};
//!
//! # async fn run() -> mix_mixer::MixerResult<()> {
//! let evaluator = Arc::new(JsonnetEvaluator::new(vec!["vendor".into()]));
//! let config = GenerateRequest::new("mixin.libsonnet")
//!     .pattern("rules-alerts")
//!     .build(evaluator);
//!
//! let mixed = generate_all(&config).await?;
//! OutputRouter::new(&config.directory).write(&mixed)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod destination;
pub mod error;
pub mod eval;
pub mod format;
pub mod generate;
pub mod mixin;
pub mod mock;
pub mod output;
pub mod vendor;

pub use config::{
    default_data_sources, DashboardsTarget, GenerateConfig, GenerateRequest, GeneratorOptions,
    RulesAlertsTarget, DASHBOARDS_DIR, DEFAULT_OUTPUT_DIR,
};
pub use destination::{Destination, DestinationMap, DestinationPattern, RECORD_SEPARATOR};
pub use error::{MixerError, MixerResult};
pub use eval::{Evaluator, JsonnetEvaluator, DEFAULT_JSONNET_PROGRAM};
pub use format::Formatter;
pub use generate::{generate_all, generate_dashboards, generate_rules_alerts};
pub use mixin::{
    DashboardsOptions, DataSource, GenerationMode, Mixin, RulesAlertsOptions, SectionKind,
};
pub use mock::{ScriptedEvaluator, ScriptedResponse};
pub use output::OutputRouter;
pub use vendor::{available_vendor, VENDOR_DIR};
