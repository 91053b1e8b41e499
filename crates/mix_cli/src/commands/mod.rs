//! CLI command definitions.
//!
//! Each subcommand maps to one workflow: generating artifacts from a local
//! mixin, installing a mixin from the catalog, or listing the catalog.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod generate;
pub mod install;
pub mod list;

/// mixtool - generate and install monitoring mixins
#[derive(Parser)]
#[command(name = "mixtool")]
#[command(version, about = "mixtool - generate and install monitoring mixins")]
#[command(long_about = r#"
mixtool evaluates monitoring mixins and writes their alerting rules,
recording rules and dashboards as deployable files.

WORKFLOWS:
  generate alerts      → Alerting rules per data source
  generate rules       → Recording rules per data source
  generate dashboards  → One file per dashboard
  generate all         → Rules, alerts and dashboards in one pass
  install              → Fetch a mixin, generate it, optionally push rules
  list                 → List mixins published in the catalog

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or unknown mixin
  3 - Evaluation or format failure
  4 - Catalog or dependency fetch failure
  5 - Push failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// YAML settings file providing defaults for generation flags
    #[arg(long, global = true, env = "MIXTOOL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate artifacts from a local mixin
    #[command(subcommand)]
    Generate(generate::GenerateCommand),

    /// Install a mixin by catalog name or URL
    Install(install::InstallArgs),

    /// List mixins published in the catalog
    List(list::ListArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["mixtool", "-v", "-q", "list"]).is_err());
    }
}
