//! Import search path discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::MixerResult;

/// Directory jsonnet-bundler installs dependencies into.
pub const VENDOR_DIR: &str = "vendor";

/// Extend `jpath` with the `vendor` directory next to `import_path`, if any.
///
/// The directory is appended last and only once.
pub fn available_vendor(import_path: &Path, mut jpath: Vec<PathBuf>) -> MixerResult<Vec<PathBuf>> {
    let base = match import_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let vendor = base.join(VENDOR_DIR);

    if !vendor.is_dir() {
        return Ok(jpath);
    }

    let canonical = vendor.canonicalize()?;
    let already_listed = jpath
        .iter()
        .any(|dir| dir.canonicalize().map(|d| d == canonical).unwrap_or(false));

    if !already_listed {
        debug!("Adding {:?} to the import search path", vendor);
        jpath.push(vendor);
    }
    Ok(jpath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_vendor_appended() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("vendor")).unwrap();
        let file = temp.path().join("mixin.libsonnet");

        let jpath = available_vendor(&file, vec![PathBuf::from("lib")]).unwrap();
        assert_eq!(jpath, vec![PathBuf::from("lib"), temp.path().join("vendor")]);
    }

    #[test]
    fn test_vendor_not_duplicated() {
        let temp = tempdir().unwrap();
        let vendor = temp.path().join("vendor");
        fs::create_dir(&vendor).unwrap();
        let file = temp.path().join("mixin.libsonnet");

        let jpath = available_vendor(&file, vec![vendor.clone()]).unwrap();
        assert_eq!(jpath, vec![vendor]);
    }

    #[test]
    fn test_no_vendor() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("mixin.libsonnet");

        let jpath = available_vendor(&file, Vec::new()).unwrap();
        assert!(jpath.is_empty());
    }
}
