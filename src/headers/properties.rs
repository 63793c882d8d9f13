// goby: Readers for the Goby compact reads and alignment formats.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use crate::headers::read_optional_file_bytes;
use crate::error::GobyError;

use std::collections::BTreeMap;
use std::path::Path;

/// Key/value pairs from a `.stats` file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    /// Parse properties from text.
    ///
    /// Each line is `key=value`, `key: value` or `key value`. The key ends at
    /// the first `=`, `:` or whitespace. Lines starting with `#` or `!` are
    /// comments.
    pub fn parse(
        text: &str,
    ) -> Self {
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        text.lines().map(|line| line.trim()).for_each(|line| {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                return
            }
            let (key, value) = match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
                Some(pos) => {
                    let rest = line[pos..].trim_start();
                    (&line[0..pos], rest.strip_prefix(['=', ':']).unwrap_or(rest))
                },
                None => (line, ""),
            };
            values.insert(key.to_string(), value.trim().to_string());
        });
        Properties { values }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.values.get(key).map(|x| x.as_str())
    }

    /// Value of `key` parsed as `T`, None if absent or unparseable.
    pub fn get_parsed<T: std::str::FromStr>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.get(key)?.parse::<T>().ok()
    }

    pub fn len(
        &self,
    ) -> usize {
        self.values.len()
    }

    pub fn is_empty(
        &self,
    ) -> bool {
        self.values.is_empty()
    }

    /// Pairs in key order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Read the `.stats` file at `path`.
///
/// A missing file is logged and read as empty properties.
pub fn read_properties(
    path: &Path,
) -> Result<Properties, GobyError> {
    match read_optional_file_bytes(path)? {
        Some(bytes) => Ok(Properties::parse(&String::from_utf8_lossy(&bytes))),
        None => Ok(Properties::default()),
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_separators_and_comments() {
        use super::Properties;

        let text = "# written by goby\n! also a comment\n\nnumber.of.queries=1000\n  aligner : bwa \nsorted true\nempty=\n";
        let got = Properties::parse(text);

        assert_eq!(got.len(), 4);
        assert_eq!(got.get("number.of.queries"), Some("1000"));
        assert_eq!(got.get("aligner"), Some("bwa"));
        assert_eq!(got.get("sorted"), Some("true"));
        assert_eq!(got.get("empty"), Some(""));
        assert_eq!(got.get_parsed::<u64>("number.of.queries"), Some(1000));
        assert_eq!(got.get_parsed::<u64>("aligner"), None);
    }

    #[test]
    fn key_ends_at_first_separator() {
        use super::Properties;

        let got = Properties::parse("key value:x\nurl=http://host:80\nratio = =2\nflag\n");

        assert_eq!(got.get("key"), Some("value:x"));
        assert_eq!(got.get("key value"), None);
        assert_eq!(got.get("url"), Some("http://host:80"));
        assert_eq!(got.get("ratio"), Some("=2"));
        assert_eq!(got.get("flag"), Some(""));
    }

    #[test]
    fn missing_stats_file_is_empty() {
        use super::read_properties;

        let dir = tempfile::tempdir().unwrap();
        let got = read_properties(&dir.path().join("sample.stats")).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn read_stats_file() {
        use super::read_properties;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.stats");
        std::fs::write(&path, "b=2\na=1\n").unwrap();

        let got: Vec<(String, String)> = read_properties(&path).unwrap().iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

        assert_eq!(got, vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]);
    }
}
