//! Downloading a mixin and its dependencies.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// Default jsonnet-bundler program.
pub const DEFAULT_JB_PROGRAM: &str = "jb";

/// Directory, relative to the install directory, holding fetched packages.
pub const DEFAULT_JSONNET_HOME: &str = "vendor";

/// Fetches a mixin and its transitive imports into a directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DependencyFetcher: Send + Sync {
    /// Download `url` into `directory`, placing packages under `directory/jsonnet_home`.
    async fn fetch(&self, url: &str, jsonnet_home: &str, directory: &Path) -> RegistryResult<()>;
}

/// Fetcher driving the jsonnet-bundler command line tool.
#[derive(Debug, Clone)]
pub struct JsonnetBundler {
    program: String,
}

impl Default for JsonnetBundler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonnetBundler {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_JB_PROGRAM.to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn init_args() -> Vec<String> {
        vec!["init".to_string()]
    }

    fn install_args(url: &str, jsonnet_home: &str) -> Vec<String> {
        vec![
            format!("--jsonnetpkg-home={}", jsonnet_home),
            "install".to_string(),
            url.to_string(),
        ]
    }

    async fn run(&self, args: &[String], directory: &Path) -> RegistryResult<()> {
        debug!("Running {} {} in {:?}", self.program, args.join(" "), directory);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(directory)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                RegistryError::Fetch(format!("failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RegistryError::Fetch(format!(
                "{} {} failed: {}",
                self.program,
                args.first().map(String::as_str).unwrap_or_default(),
                stderr.trim_end()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DependencyFetcher for JsonnetBundler {
    async fn fetch(&self, url: &str, jsonnet_home: &str, directory: &Path) -> RegistryResult<()> {
        if directory.join("jsonnetfile.json").exists() {
            debug!("jsonnetfile.json already present in {:?}", directory);
        } else {
            self.run(&Self::init_args(), directory).await?;
        }

        info!("Installing {} into {:?}", url, directory.join(jsonnet_home));
        self.run(&Self::install_args(url, jsonnet_home), directory)
            .await
    }
}
