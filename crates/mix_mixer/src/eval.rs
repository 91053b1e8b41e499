//! Template evaluation.
//!
//! The default evaluator runs a jsonnet-compatible program (`jsonnet` unless
//! configured otherwise) on each snippet. Evaluation is deterministic, so a
//! failure is reported once and never retried.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MixerError, MixerResult};
use crate::mixin::Mixin;

/// Default evaluator program.
pub const DEFAULT_JSONNET_PROGRAM: &str = "jsonnet";

/// Evaluates a template snippet into encoded bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn exec(&self, snippet: &Mixin) -> MixerResult<Vec<u8>>;
}

/// Evaluator backed by an external jsonnet program.
#[derive(Debug, Clone)]
pub struct JsonnetEvaluator {
    program: String,
    jpath: Vec<PathBuf>,
    ext_vars: BTreeMap<String, String>,
}

impl JsonnetEvaluator {
    /// Create an evaluator searching `jpath` (in order) for imports.
    pub fn new(jpath: Vec<PathBuf>) -> Self {
        Self {
            program: DEFAULT_JSONNET_PROGRAM.to_string(),
            jpath,
            ext_vars: BTreeMap::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Expose a named external variable to templates (`std.extVar(name)`).
    pub fn with_ext_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.ext_vars.insert(name.into(), value.into());
        self
    }

    pub fn with_ext_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.ext_vars.extend(vars);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn jpath(&self) -> &[PathBuf] {
        &self.jpath
    }

    /// Command line arguments for evaluating `snippet`.
    fn build_args(&self, snippet: &Mixin) -> Vec<String> {
        let mut args = Vec::new();

        for dir in &self.jpath {
            args.push("-J".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }

        for (name, value) in &self.ext_vars {
            args.push("--ext-str".to_string());
            args.push(format!("{}={}", name, value));
        }

        args.push("-e".to_string());
        args.push(snippet.to_string_lossy());
        args
    }
}

#[async_trait]
impl Evaluator for JsonnetEvaluator {
    async fn exec(&self, snippet: &Mixin) -> MixerResult<Vec<u8>> {
        let args = self.build_args(snippet);
        debug!(program = %self.program, jpath = ?self.jpath, "Evaluating snippet");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| MixerError::EvaluatorUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MixerError::Evaluation(stderr.trim_end().to_string()));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_order() {
        let eval = JsonnetEvaluator::new(vec![PathBuf::from("vendor"), PathBuf::from("lib")])
            .with_ext_var("cluster", "prod");
        let args = eval.build_args(&Mixin::from("{}"));

        assert_eq!(
            args,
            vec!["-J", "vendor", "-J", "lib", "--ext-str", "cluster=prod", "-e", "{}"]
        );
    }

    #[tokio::test]
    async fn test_missing_program() {
        let eval = JsonnetEvaluator::new(Vec::new()).with_program("mixtool-no-such-jsonnet");
        let err = eval.exec(&Mixin::from("{}")).await.unwrap_err();
        assert!(matches!(err, MixerError::EvaluatorUnavailable { .. }));
    }

    #[tokio::test]
    #[ignore = "requires the jsonnet program on PATH"]
    async fn test_real_evaluation() {
        let eval = JsonnetEvaluator::new(Vec::new());
        let out = eval.exec(&Mixin::from("{ a: 1 + 1 }")).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!({ "a": 2 }));
    }
}
