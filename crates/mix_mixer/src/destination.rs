//! Destinations of generated artifacts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::Formatter;
use crate::mixin::{DataSource, Mixin};

/// Separator placed between artifacts that share a destination.
pub const RECORD_SEPARATOR: &[u8] = b"----\n";

/// Where an artifact ends up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    /// Standard output of the process.
    Stdout,
    /// File path relative to the output directory.
    File(PathBuf),
}

impl Destination {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// File naming scheme for rules and alerts artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPattern {
    Stdout,
    /// `<code>-<suffix>.<extension>`
    Suffix { suffix: String, extension: String },
}

impl DestinationPattern {
    /// Interpret a user supplied pattern. Empty, `-` and `stdout` stream to stdout.
    pub fn parse(pattern: Option<&str>, formatter: Formatter) -> Self {
        match pattern {
            None | Some("") | Some("-") | Some("stdout") => Self::Stdout,
            Some(suffix) => Self::Suffix {
                suffix: suffix.to_string(),
                extension: formatter.extension().to_string(),
            },
        }
    }

    pub fn destination_for(&self, data_source: DataSource) -> Destination {
        match self {
            Self::Stdout => Destination::Stdout,
            Self::Suffix { suffix, extension } => Destination::File(PathBuf::from(format!(
                "{}-{}.{}",
                data_source.short_code(),
                suffix,
                extension
            ))),
        }
    }
}

/// Generated artifacts keyed by destination.
///
/// The only mutation is insert-or-merge; a destination that is already
/// present gets the new content appended after [`RECORD_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationMap {
    entries: BTreeMap<Destination, Mixin>,
}

impl DestinationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_or_merge(&mut self, destination: Destination, content: Mixin) {
        match self.entries.remove(&destination) {
            Some(previous) => {
                let merged = previous.join(RECORD_SEPARATOR, &content);
                self.entries.insert(destination, merged);
            }
            None => {
                self.entries.insert(destination, content);
            }
        }
    }

    /// Merge every entry of `other` into this map, in `other`'s order.
    pub fn merge(&mut self, other: DestinationMap) {
        for (destination, content) in other.entries {
            self.insert_or_merge(destination, content);
        }
    }

    /// Move every file destination under `dir`. Stdout stays as is.
    pub fn nest_under(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut nested = DestinationMap::new();
        for (destination, content) in self.entries {
            let destination = match destination {
                Destination::File(path) => Destination::File(dir.join(path)),
                Destination::Stdout => Destination::Stdout,
            };
            nested.insert_or_merge(destination, content);
        }
        nested
    }

    pub fn get(&self, destination: &Destination) -> Option<&Mixin> {
        self.entries.get(destination)
    }

    pub fn contains(&self, destination: &Destination) -> bool {
        self.entries.contains_key(destination)
    }

    pub fn destinations(&self) -> Vec<&Destination> {
        self.entries.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Destination, &Mixin)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for DestinationMap {
    type Item = (Destination, Mixin);
    type IntoIter = std::collections::btree_map::IntoIter<Destination, Mixin>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_file_names() {
        let pattern = DestinationPattern::parse(Some("alerts"), Formatter::Yaml);
        assert_eq!(
            pattern.destination_for(DataSource::Loki),
            Destination::file("loki-alerts.yml")
        );
        assert_eq!(
            pattern.destination_for(DataSource::Prometheus),
            Destination::file("prom-alerts.yml")
        );

        let pattern = DestinationPattern::parse(Some("rules"), Formatter::Identity);
        assert_eq!(
            pattern.destination_for(DataSource::Prometheus),
            Destination::file("prom-rules.json")
        );
    }

    #[test]
    fn test_pattern_stdout_markers() {
        for marker in [None, Some(""), Some("-"), Some("stdout")] {
            let pattern = DestinationPattern::parse(marker, Formatter::Yaml);
            assert_eq!(pattern, DestinationPattern::Stdout);
            assert_eq!(pattern.destination_for(DataSource::Loki), Destination::Stdout);
        }
    }

    #[test]
    fn test_insert_or_merge() {
        let mut map = DestinationMap::new();
        map.insert_or_merge(Destination::Stdout, Mixin::from("first\n"));
        map.insert_or_merge(Destination::file("a.yml"), Mixin::from("a\n"));
        map.insert_or_merge(Destination::Stdout, Mixin::from("second\n"));

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(&Destination::Stdout).unwrap().as_bytes(),
            b"first\n----\nsecond\n"
        );
        assert_eq!(map.get(&Destination::file("a.yml")).unwrap().as_bytes(), b"a\n");
    }

    #[test]
    fn test_nest_under() {
        let mut map = DestinationMap::new();
        map.insert_or_merge(Destination::file("d1"), Mixin::from("1"));
        map.insert_or_merge(Destination::Stdout, Mixin::from("s"));

        let nested = map.nest_under("dashboards");
        assert!(nested.contains(&Destination::file("dashboards/d1")));
        assert!(nested.contains(&Destination::Stdout));
    }
}
