//! # mix_registry
//!
//! Mixin installation for mixtool.
//!
//! Resolves a mixin reference (catalog name or URL), fetches the mixin with
//! its dependencies, locates its entry file and pushes generated rules to a
//! rule-management endpoint.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mix_mixer::{Evaluator, JsonnetEvaluator};
//! use mix_registry::{CatalogClient, InstallOptions, Installer, JsonnetBundler};
//!
//! # async fn run() -> mix_registry::RegistryResult<()> {
//! let url = CatalogClient::default().resolve("node-exporter").await?;
//!
//! let installer = Installer::new(Arc::new(JsonnetBundler::new()), |jpath| {
//!     Arc::new(JsonnetEvaluator::new(jpath)) as Arc<dyn Evaluator>
//! });
//! let report = installer.install(&url, &InstallOptions::new("node-mixin")).await?;
//! println!("entry file: {:?}", report.import_path);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod install;
pub mod locate;
pub mod push;

pub use catalog::{Catalog, CatalogClient, CatalogEntry, DEFAULT_CATALOG_URL};
pub use error::{RegistryError, RegistryResult};
pub use fetch::{DependencyFetcher, JsonnetBundler, DEFAULT_JB_PROGRAM, DEFAULT_JSONNET_HOME};
pub use install::{InstallOptions, InstallReport, Installer, INSTALL_PATTERN};
pub use locate::{derive_import_path, locate_import_file, MIXIN_ENTRY_FILE};
pub use push::{PushClient, DEFAULT_BIND_ADDRESS, RULES_API_PATH};
