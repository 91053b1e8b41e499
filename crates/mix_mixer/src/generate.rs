//! Artifact generation.
//!
//! Rules and alerts are generated once per target, strictly in target order,
//! and merged into one [`DestinationMap`]. Dashboards are evaluated once and
//! split into one artifact per dashboard.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde_json::value::RawValue;
use tracing::{debug, info, warn};

use crate::config::{DashboardsTarget, GenerateConfig, RulesAlertsTarget, DASHBOARDS_DIR};
use crate::destination::{Destination, DestinationMap};
use crate::error::{MixerError, MixerResult};
use crate::mixin::{GenerationMode, Mixin};

/// Generate rules and/or alerts for every target.
///
/// Targets sharing a destination are concatenated in target order with the
/// record separator between them.
pub async fn generate_rules_alerts(
    targets: &[RulesAlertsTarget],
    mode: GenerationMode,
) -> MixerResult<DestinationMap> {
    let mut mixed = DestinationMap::new();

    for target in targets {
        debug!(
            "Generating {:?} for {} from {:?}",
            mode, target.options.data_source, target.options.import_path
        );
        let snippet = mode.snippet(&target.options);
        let out = target.generator.evaluate(&snippet).await?;
        let formatted = out.apply_formatter(target.formatter)?;

        info!(
            "Generated {} {:?} ({} bytes) -> {}",
            target.options.data_source,
            mode,
            formatted.len(),
            target.destination
        );
        mixed.insert_or_merge(target.destination.clone(), formatted);
    }

    Ok(mixed)
}

/// Generate one artifact per dashboard, keyed by dashboard name.
///
/// The whole request fails if the evaluated dashboards are not an object.
/// Dashboard names are reduced to relative paths so every file stays under
/// the output directory.
pub async fn generate_dashboards(target: &DashboardsTarget) -> MixerResult<DestinationMap> {
    let snippet = target.options.snippet();
    let out = target.generator.evaluate(&snippet).await?;

    let dashboards: BTreeMap<String, Box<RawValue>> =
        serde_json::from_slice(out.as_bytes()).map_err(MixerError::Decode)?;

    let mut mixed = DestinationMap::new();
    for (name, dashboard) in dashboards {
        let formatted = Mixin::from(dashboard.get()).apply_formatter(target.formatter)?;
        mixed.insert_or_merge(Destination::File(dashboard_path(&name)?), formatted);
    }

    info!("Generated {} dashboard(s)", mixed.len());
    Ok(mixed)
}

/// Keep only the plain components of a dashboard name.
///
/// Roots, prefixes, `.` and `..` are dropped.
fn dashboard_path(name: &str) -> MixerResult<PathBuf> {
    let path: PathBuf = Path::new(name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if path.as_os_str().is_empty() {
        return Err(MixerError::InvalidDashboardName(name.to_string()));
    }
    if path.as_path() != Path::new(name) {
        warn!("Dashboard name {:?} written as {:?}", name, path);
    }
    Ok(path)
}

/// Generate rules, alerts and dashboards in one map.
///
/// Dashboards land under the `dashboards` subdirectory.
pub async fn generate_all(config: &GenerateConfig) -> MixerResult<DestinationMap> {
    let mut mixed = generate_rules_alerts(&config.rules_alerts, GenerationMode::RulesAndAlerts).await?;
    let dashboards = generate_dashboards(&config.dashboards).await?;
    mixed.merge(dashboards.nest_under(DASHBOARDS_DIR));
    Ok(mixed)
}
