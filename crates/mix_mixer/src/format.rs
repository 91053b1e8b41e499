//! Output formatting applied to evaluated mixins.

use serde::{Deserialize, Serialize};

use crate::error::{MixerError, MixerResult};
use crate::mixin::Mixin;

/// Pure transform applied uniformly to evaluated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formatter {
    /// Keep the evaluator's JSON as is.
    Identity,
    /// Re-encode JSON as YAML.
    #[default]
    Yaml,
}

impl Formatter {
    pub fn from_yaml_flag(yaml: bool) -> Self {
        if yaml {
            Self::Yaml
        } else {
            Self::Identity
        }
    }

    /// File extension of the produced content.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Identity => "json",
            Self::Yaml => "yml",
        }
    }

    pub fn apply(&self, content: Mixin) -> MixerResult<Mixin> {
        match self {
            Self::Identity => Ok(content),
            Self::Yaml => json_to_yaml(&content),
        }
    }
}

fn json_to_yaml(content: &Mixin) -> MixerResult<Mixin> {
    let value: serde_json::Value = serde_json::from_slice(content.as_bytes())
        .map_err(|e| MixerError::Format(format!("invalid JSON: {}", e)))?;
    let yaml = serde_yaml::to_string(&value)
        .map_err(|e| MixerError::Format(format!("YAML encoding: {}", e)))?;
    Ok(Mixin::from(yaml))
}
