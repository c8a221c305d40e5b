//! Worker argument files
//!
//! The build tool writes persistent-worker arguments as alternating lines:
//! a flag, then its value. There is no header and no escaping.

use std::io::BufRead;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::common::{Error, Result};

/// Flag/value pairs in the order they first appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerArgs {
    entries: Vec<(String, String)>,
}

impl WorkerArgs {
    /// Set `key`, replacing an earlier value in place
    ///
    /// Linear scan; worker-args files hold a few dozen flags at most.
    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair was parsed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for WorkerArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Pair up lines as key, value, key, value, ...
///
/// An empty line never opens a pair. A key left without a value at the end
/// of input is dropped.
pub fn parse_lines<I, S>(lines: I) -> WorkerArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = WorkerArgs::default();
    let mut pending: Option<String> = None;

    for line in lines {
        let line = line.into();
        match pending.take() {
            Some(key) => args.insert(key, line),
            None if line.is_empty() => {}
            None => pending = Some(line),
        }
    }

    if let Some(key) = pending {
        tracing::debug!(key = %key, "Dropping worker argument without a value");
    }
    args
}

/// Parse worker arguments from a reader
pub fn parse<R: BufRead>(reader: R) -> Result<WorkerArgs> {
    let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(parse_lines(lines))
}

/// Read and parse a worker-args file
pub fn read_file(path: &Path) -> Result<WorkerArgs> {
    let file = std::fs::File::open(path).map_err(|e| Error::file_read(path, e))?;
    parse(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_alternate_lines() {
        let args = parse_lines(["K1", "V1", "K2", "V2"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("K1"), Some("V1"));
        assert_eq!(args.get("K2"), Some("V2"));
    }

    #[test]
    fn test_dangling_key_is_dropped() {
        let args = parse_lines(["K1", "V1", "K2"]);
        assert_eq!(args.iter().collect::<Vec<_>>(), vec![("K1", "V1")]);
        assert_eq!(args.get("K2"), None);
    }

    #[test]
    fn test_duplicate_key_last_value_wins_in_first_position() {
        let args = parse_lines(["--a", "1", "--b", "2", "--a", "3"]);
        assert_eq!(args.iter().collect::<Vec<_>>(), vec![("--a", "3"), ("--b", "2")]);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let args = parse_lines(["--flag", "", "--next", "x"]);
        assert_eq!(args.get("--flag"), Some(""));
        assert_eq!(args.get("--next"), Some("x"));
    }

    #[test]
    fn test_empty_line_does_not_open_a_pair() {
        let args = parse_lines(["", "--flag", "v"]);
        assert_eq!(args.iter().collect::<Vec<_>>(), vec![("--flag", "v")]);
    }

    #[test]
    fn test_parse_reader_strips_line_endings() {
        let input = "--kotlin_module_name\r\nfoo\n--classpath\nbar.jar\n";
        let args = parse(input.as_bytes()).unwrap();
        assert_eq!(args.get("--kotlin_module_name"), Some("foo"));
        assert_eq!(args.get("--classpath"), Some("bar.jar"));
    }

    #[test]
    fn test_serializes_as_ordered_json_object() {
        let args = parse_lines(["--z", "1", "--a", "2"]);
        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"{"--z":"1","--a":"2"}"#
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/nonexistent/app-worker.args")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
