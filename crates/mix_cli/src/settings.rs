//! Optional YAML settings file.
//!
//! Every key is optional. A command-line flag always wins over the file, and
//! the file wins over the built-in default.
//!
//! ```yaml
//! output: build/monitoring
//! data_sources: [prometheus]
//! yaml: true
//! jpath: [lib, vendor]
//! jsonnet: jrsonnet
//! ext_vars:
//!   cluster: prod
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use mix_mixer::{default_data_sources, DEFAULT_JSONNET_PROGRAM, DEFAULT_OUTPUT_DIR};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub output: Option<PathBuf>,
    pub data_sources: Option<Vec<String>>,
    pub yaml: Option<bool>,
    pub jpath: Option<Vec<PathBuf>>,
    pub jsonnet: Option<String>,
    pub ext_vars: BTreeMap<String, String>,
}

impl Settings {
    /// Load the settings file, or the empty settings when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = Self::from_yaml(&content)
            .with_context(|| format!("Invalid settings file {:?}", path))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document decodes to null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn output(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn data_sources(&self, flag: Vec<String>) -> Vec<String> {
        if !flag.is_empty() {
            return flag;
        }
        self.data_sources
            .clone()
            .unwrap_or_else(default_data_sources)
    }

    pub fn yaml(&self, flag: Option<bool>) -> bool {
        flag.or(self.yaml).unwrap_or(true)
    }

    pub fn jpath(&self, flag: Vec<PathBuf>) -> Vec<PathBuf> {
        if !flag.is_empty() {
            return flag;
        }
        self.jpath.clone().unwrap_or_default()
    }

    pub fn jsonnet(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.jsonnet.clone())
            .unwrap_or_else(|| DEFAULT_JSONNET_PROGRAM.to_string())
    }

    /// File variables overridden key by key by flag variables.
    pub fn ext_vars(&self, flag: Vec<(String, String)>) -> BTreeMap<String, String> {
        let mut vars = self.ext_vars.clone();
        vars.extend(flag);
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output(None), PathBuf::from("out"));
        assert_eq!(settings.data_sources(vec![]), vec!["loki", "prometheus"]);
        assert!(settings.yaml(None));
        assert!(settings.jpath(vec![]).is_empty());
        assert_eq!(settings.jsonnet(None), "jsonnet");
        assert!(settings.ext_vars(vec![]).is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = Settings::from_yaml(
            "output: build\ndata_sources: [prometheus]\nyaml: false\njpath: [lib]\njsonnet: jrsonnet\n",
        )
        .unwrap();

        assert_eq!(settings.output(None), PathBuf::from("build"));
        assert_eq!(settings.data_sources(vec![]), vec!["prometheus"]);
        assert!(!settings.yaml(None));
        assert_eq!(settings.jpath(vec![]), vec![PathBuf::from("lib")]);
        assert_eq!(settings.jsonnet(None), "jrsonnet");
    }

    #[test]
    fn test_flags_override_file() {
        let settings = Settings::from_yaml("output: build\nyaml: false\njsonnet: jrsonnet\n").unwrap();

        assert_eq!(settings.output(Some("flag".into())), PathBuf::from("flag"));
        assert!(settings.yaml(Some(true)));
        assert_eq!(settings.jsonnet(Some("go-jsonnet".into())), "go-jsonnet");
        assert_eq!(
            settings.data_sources(vec!["loki".to_string()]),
            vec!["loki"]
        );
    }

    #[test]
    fn test_ext_vars_merge() {
        let settings = Settings::from_yaml("ext_vars:\n  cluster: prod\n  region: eu\n").unwrap();
        let vars = settings.ext_vars(vec![("cluster".to_string(), "dev".to_string())]);

        assert_eq!(vars.get("cluster").map(String::as_str), Some("dev"));
        assert_eq!(vars.get("region").map(String::as_str), Some("eu"));
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(Settings::load(None).unwrap(), Settings::default());

        let temp = tempdir().unwrap();
        assert!(Settings::load(Some(&temp.path().join("absent.yml"))).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_yaml("outptu: build\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mixtool.yml");
        fs::write(&path, "data_sources: [loki]\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.data_sources, Some(vec!["loki".to_string()]));
    }
}
