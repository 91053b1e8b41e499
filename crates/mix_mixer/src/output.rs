//! Writing generated artifacts to disk or standard output.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::destination::{Destination, DestinationMap};
use crate::error::MixerResult;

/// Routes each artifact of a [`DestinationMap`] to its destination.
///
/// Files are written below the output directory, overwriting existing files.
/// The first failure aborts the write; files already written stay in place.
#[derive(Debug, Clone)]
pub struct OutputRouter {
    directory: PathBuf,
}

impl OutputRouter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write every artifact, streaming stdout destinations to the process stdout.
    pub fn write(&self, mixed: &DestinationMap) -> MixerResult<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(mixed, &mut handle)
    }

    /// Write every artifact, streaming stdout destinations to `stream`.
    pub fn write_to<W: Write>(&self, mixed: &DestinationMap, stream: &mut W) -> MixerResult<()> {
        let mut written = 0;

        for (destination, content) in mixed.iter() {
            match destination {
                Destination::Stdout => {
                    stream.write_all(content.as_bytes())?;
                    stream.flush()?;
                }
                Destination::File(relative) => {
                    fs::create_dir_all(&self.directory)?;
                    let full = self.directory.join(relative);
                    if let Some(parent) = full.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&full, content.as_bytes())?;
                    debug!("Wrote {:?} ({} bytes)", full, content.len());
                    written += 1;
                }
            }
        }

        if written > 0 {
            info!("Wrote {} file(s) to {:?}", written, self.directory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixin::Mixin;
    use tempfile::tempdir;

    #[test]
    fn test_write_files_and_stream() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");

        let mut mixed = DestinationMap::new();
        mixed.insert_or_merge(Destination::file("loki-rules.yml"), Mixin::from("groups: []\n"));
        mixed.insert_or_merge(Destination::file("dashboards/a.json"), Mixin::from("{}"));
        mixed.insert_or_merge(Destination::Stdout, Mixin::from("streamed\n"));

        let mut stream = Vec::new();
        OutputRouter::new(&out).write_to(&mixed, &mut stream).unwrap();

        assert_eq!(fs::read_to_string(out.join("loki-rules.yml")).unwrap(), "groups: []\n");
        assert_eq!(fs::read_to_string(out.join("dashboards/a.json")).unwrap(), "{}");
        assert_eq!(stream, b"streamed\n");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("prom-alerts.yml"), "old").unwrap();

        let mut mixed = DestinationMap::new();
        mixed.insert_or_merge(Destination::file("prom-alerts.yml"), Mixin::from("new"));
        OutputRouter::new(temp.path()).write_to(&mixed, &mut Vec::new()).unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("prom-alerts.yml")).unwrap(), "new");
    }

    #[test]
    fn test_stream_only_creates_no_directory() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("never");

        let mut mixed = DestinationMap::new();
        mixed.insert_or_merge(Destination::Stdout, Mixin::from("x"));
        OutputRouter::new(&out).write_to(&mixed, &mut Vec::new()).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn test_io_failure_is_reported() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let mut mixed = DestinationMap::new();
        mixed.insert_or_merge(Destination::file("a.yml"), Mixin::from("x"));
        let result = OutputRouter::new(&blocker).write_to(&mixed, &mut Vec::new());

        assert!(matches!(result, Err(crate::error::MixerError::Io(_))));
    }
}
