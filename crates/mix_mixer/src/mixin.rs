//! Mixin content and section selection.
//!
//! A mixin exposes one section per backend and artifact kind, named
//! `<source>Rules` and `<source>Alerts`, plus a single `grafanaDashboards`
//! section shared by all backends. The snippets built here import the mixin
//! and pick one of those sections, falling back to an empty object when the
//! section is absent. Absence is decided by the template engine, so selection
//! itself never fails.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::MixerResult;
use crate::format::Formatter;

/// Section holding the dashboards of a mixin.
pub const DASHBOARDS_SECTION: &str = "grafanaDashboards";

/// Raw mixin bytes: a template snippet before evaluation, artifact content after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mixin(Vec<u8>);

impl Mixin {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view, mainly for logging and snippets.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Append `separator` and `other` after this content.
    pub fn join(mut self, separator: &[u8], other: &Mixin) -> Self {
        self.0.extend_from_slice(separator);
        self.0.extend_from_slice(&other.0);
        self
    }

    pub fn apply_formatter(self, formatter: Formatter) -> MixerResult<Mixin> {
        formatter.apply(self)
    }
}

impl From<Vec<u8>> for Mixin {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<String> for Mixin {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for Mixin {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Mixin {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Monitoring backend whose section of a mixin is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Loki,
    Prometheus,
}

impl DataSource {
    pub const ALL: [DataSource; 2] = [DataSource::Loki, DataSource::Prometheus];

    /// Look up a backend by its user-facing name.
    ///
    /// Unknown names yield `None`; callers skip them instead of failing.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "loki" => Some(Self::Loki),
            "prometheus" => Some(Self::Prometheus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loki => "loki",
            Self::Prometheus => "prometheus",
        }
    }

    /// Short code used as the prefix of generated file names.
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Loki => "loki",
            Self::Prometheus => "prom",
        }
    }

    /// Name of the mixin field holding this backend's `kind` section.
    pub fn section_name(&self, kind: SectionKind) -> &'static str {
        match (self, kind) {
            (Self::Loki, SectionKind::Rules) => "lokiRules",
            (Self::Loki, SectionKind::Alerts) => "lokiAlerts",
            (Self::Prometheus, SectionKind::Rules) => "prometheusRules",
            (Self::Prometheus, SectionKind::Alerts) => "prometheusAlerts",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-backend section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Rules,
    Alerts,
}

/// Which backend section to pull and which file to import it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesAlertsOptions {
    pub data_source: DataSource,
    pub import_path: PathBuf,
}

impl RulesAlertsOptions {
    pub fn new(data_source: DataSource, import_path: impl Into<PathBuf>) -> Self {
        Self {
            data_source,
            import_path: import_path.into(),
        }
    }
}

/// Dashboards have no per-backend variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardsOptions {
    pub import_path: PathBuf,
}

impl DashboardsOptions {
    pub fn new(import_path: impl Into<PathBuf>) -> Self {
        Self {
            import_path: import_path.into(),
        }
    }

    /// Snippet evaluating to the mixin's dashboards, or `{}`.
    pub fn snippet(&self) -> Mixin {
        let mut snippet = import_header(&self.import_path);
        snippet.push_str(&format!(
            "\nif std.objectHasAll(mixin, \"{d}\")\nthen mixin.{d}\nelse {{}}\n",
            d = DASHBOARDS_SECTION
        ));
        Mixin::from(snippet)
    }
}

/// What a rules/alerts generation request extracts from each backend section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Alerts,
    Rules,
    /// Union of rules and alerts when both exist, otherwise whichever exists.
    RulesAndAlerts,
}

impl GenerationMode {
    /// Build the snippet selecting this mode's section(s) for `opts`.
    pub fn snippet(&self, opts: &RulesAlertsOptions) -> Mixin {
        let rules = opts.data_source.section_name(SectionKind::Rules);
        let alerts = opts.data_source.section_name(SectionKind::Alerts);

        let body = match self {
            Self::Alerts => single_section(alerts),
            Self::Rules => single_section(rules),
            Self::RulesAndAlerts => format!(
                "\nif std.objectHasAll(mixin, \"{r}\") && std.objectHasAll(mixin, \"{a}\")\n\
                 then mixin.{r} + mixin.{a}\n\
                 else if std.objectHasAll(mixin, \"{r}\")\n\
                 then mixin.{r}\n\
                 else if std.objectHasAll(mixin, \"{a}\")\n\
                 then mixin.{a}\n\
                 else {{}}\n",
                r = rules,
                a = alerts
            ),
        };

        let mut snippet = import_header(&opts.import_path);
        snippet.push_str(&body);
        Mixin::from(snippet)
    }
}

fn single_section(section: &str) -> String {
    format!(
        "\nif std.objectHasAll(mixin, \"{s}\")\nthen mixin.{s}\nelse {{}}\n",
        s = section
    )
}

fn import_header(import_path: &std::path::Path) -> String {
    format!(
        "\nlocal mixin = (import {});\n",
        quote(&import_path.to_string_lossy())
    )
}

/// Double-quoted string literal understood by the template engine.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
