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

//! Reader for `.compact-reads` files.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use goby::reads::ReadsReader;
//! use std::path::Path;
//!
//! let reader = ReadsReader::open(Path::new("sample.compact-reads")).unwrap();
//! for entry in reader {
//!     let entry = entry.unwrap();
//!     println!("{}\t{}", entry.read_index, entry.read_length);
//! }
//! ```
//!
use crate::ReaderOptions;
use crate::decoder::ReadEntries;
use crate::decoder::chunks::ChunkReader;
use crate::error::GobyError;
use crate::format::ReadEntry;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

pub struct ReadsReader {
    // Inputs
    path: PathBuf,

    // Internals
    entries: ReadEntries<BufReader<File>>,
}

impl ReadsReader {
    /// Opens `path` with the default [ReaderOptions].
    pub fn open(
        path: &Path,
    ) -> Result<Self, GobyError> {
        ReadsReader::open_with_options(path, &ReaderOptions::default())
    }

    pub fn open_with_options(
        path: &Path,
        options: &ReaderOptions,
    ) -> Result<Self, GobyError> {
        let chunks = ChunkReader::open(path, options.delimiter)?;
        Ok(ReadsReader { path: path.to_path_buf(), entries: ReadEntries::new(chunks) })
    }

    pub fn path(
        &self,
    ) -> &Path {
        &self.path
    }

    /// Number of entries returned so far.
    pub fn entries_read(
        &self,
    ) -> usize {
        self.entries.entries_read()
    }

    /// Closes the underlying file.
    pub fn close(
        self,
    ) {
        log::debug!("Closing {} after {} entries", self.path.display(), self.entries.entries_read());
    }
}

impl Iterator for ReadsReader {
    type Item = Result<ReadEntry, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        self.entries.next()
    }
}

impl std::iter::FusedIterator for ReadsReader {}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_entries_from_file() {
        use super::ReadsReader;
        use crate::fixtures::{container, read_entry};
        use crate::format::ReadCollection;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.compact-reads");
        let first = vec![read_entry(0, b"ACGTAC"), read_entry(1, b"GGTTAA")];
        let second = vec![read_entry(2, b"CCCCCC")];
        std::fs::write(&path, container(&[
            ReadCollection { reads: first.clone() },
            ReadCollection { reads: second.clone() },
        ])).unwrap();

        let mut reader = ReadsReader::open(&path).unwrap();
        let got: Vec<_> = reader.by_ref().map(|x| x.unwrap()).collect();

        assert_eq!(got, [first, second].concat());
        assert_eq!(reader.entries_read(), 3);
        assert_eq!(reader.path(), path.as_path());
        reader.close();
    }

    #[test]
    fn open_missing_reads_file() {
        use super::ReadsReader;
        use crate::error::GobyError;

        let dir = tempfile::tempdir().unwrap();
        let got = ReadsReader::open(&dir.path().join("sample.compact-reads"));

        assert!(matches!(got, Err(GobyError::MissingRequiredFile { .. })));
    }

    #[test]
    fn strict_options_reject_other_codecs() {
        use super::ReadsReader;
        use crate::ReaderOptions;
        use crate::compression::DelimiterPolicy;
        use crate::error::GobyError;
        use crate::fixtures::{container, read_entry};
        use crate::format::ReadCollection;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hybrid.compact-reads");
        let mut data = container(&[ReadCollection { reads: vec![read_entry(0, b"ACGT")] }]);
        data[0] = 0xFE;
        std::fs::write(&path, data).unwrap();

        let options = ReaderOptions { delimiter: DelimiterPolicy::Strict };
        let mut reader = ReadsReader::open_with_options(&path, &options).unwrap();

        match reader.next() {
            Some(Err(err @ GobyError::UnsupportedCodec { .. })) => assert_eq!(err.path(), path.as_path()),
            other => panic!("expected UnsupportedCodec, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }
}
