//! Locating the entry file of a fetched mixin.
//!
//! jsonnet-bundler places a package at `<home>/<host[:port]>/<path>`, with
//! the path percent-decoded and the `.git` repository marker removed. The
//! mixin entry file sits at the root of that directory.

use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};

/// Entry file every mixin exposes.
pub const MIXIN_ENTRY_FILE: &str = "mixin.libsonnet";

const REPOSITORY_SUFFIX: &str = ".git";

/// Derive where the entry file of `mixin_url` lives under `jsonnet_home`.
pub fn derive_import_path(jsonnet_home: &Path, mixin_url: &str) -> RegistryResult<PathBuf> {
    let url = Url::parse(mixin_url).map_err(|e| RegistryError::InvalidUrl {
        url: mixin_url.to_string(),
        message: e.to_string(),
    })?;

    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host = format!("{}:{}", host, port);
    }
    let path = urlencoding::decode(url.path())
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| url.path().to_string());
    let joined = format!("{}/{}", host, path);
    let relative: Vec<&str> = joined
        .trim_start_matches(['/', ':'])
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(|segment| segment.strip_suffix(REPOSITORY_SUFFIX).unwrap_or(segment))
        .collect();

    let mut path = jsonnet_home.to_path_buf();
    path.extend(relative);
    path.push(MIXIN_ENTRY_FILE);
    Ok(path)
}

/// Like [`derive_import_path`], but the entry file must exist.
pub fn locate_import_file(jsonnet_home: &Path, mixin_url: &str) -> RegistryResult<PathBuf> {
    let import_file = derive_import_path(jsonnet_home, mixin_url)?;
    if !import_file.is_file() {
        return Err(RegistryError::NotExist(import_file));
    }
    debug!("Located mixin entry file {:?}", import_file);
    Ok(import_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_derive_strips_repository_marker() {
        let path = derive_import_path(Path::new("vendor"), "https://example.com/repo.git/mixin").unwrap();
        assert_eq!(path, PathBuf::from("vendor/example.com/repo/mixin/mixin.libsonnet"));
    }

    #[test]
    fn test_derive_trailing_marker() {
        let path = derive_import_path(Path::new("vendor"), "https://github.com/org/mixin.git").unwrap();
        assert_eq!(path, PathBuf::from("vendor/github.com/org/mixin/mixin.libsonnet"));
    }

    #[test]
    fn test_derive_plain_url() {
        let path = derive_import_path(
            Path::new("vendor"),
            "https://github.com/grafana/jsonnet-libs/memcached-mixin",
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("vendor/github.com/grafana/jsonnet-libs/memcached-mixin/mixin.libsonnet")
        );
    }

    #[test]
    fn test_derive_keeps_port() {
        let path = derive_import_path(Path::new("vendor"), "http://git.local:3000/team/repo.git/mixin").unwrap();
        assert_eq!(
            path,
            PathBuf::from("vendor/git.local:3000/team/repo/mixin/mixin.libsonnet")
        );
    }

    #[test]
    fn test_derive_decodes_path() {
        let path = derive_import_path(Path::new("vendor"), "http://git.local:3000/repo%20x").unwrap();
        assert_eq!(path, PathBuf::from("vendor/git.local:3000/repo x/mixin.libsonnet"));
    }

    #[test]
    fn test_derive_ignores_encoded_parent_segments() {
        let path = derive_import_path(Path::new("vendor"), "https://example.com/%2E%2E/%2E%2E/mixin").unwrap();
        assert_eq!(path, PathBuf::from("vendor/example.com/mixin/mixin.libsonnet"));
    }

    #[test]
    fn test_derive_invalid_url() {
        let err = derive_import_path(Path::new("vendor"), "not a url").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidUrl { .. }));
    }

    #[test]
    fn test_locate_existing_file() {
        let temp = tempdir().unwrap();
        let home = temp.path().join("vendor");
        let dir = home.join("example.com/repo/mixin");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MIXIN_ENTRY_FILE), "{}").unwrap();

        let found = locate_import_file(&home, "https://example.com/repo.git/mixin").unwrap();
        assert_eq!(found, dir.join(MIXIN_ENTRY_FILE));
    }

    #[test]
    fn test_locate_missing_file() {
        let temp = tempdir().unwrap();
        let err = locate_import_file(temp.path(), "https://example.com/repo/mixin").unwrap_err();
        assert!(matches!(err, RegistryError::NotExist(_)));
    }
}
