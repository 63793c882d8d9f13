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

//! Reader for a compact alignment.
//!
//! [AlignmentReader] opens all companion files of an alignment at once. The
//! header and the `.entries` file must exist. The `.stats` and `.tmh` files
//! are read if present and left empty otherwise.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use goby::alignments::AlignmentReader;
//! use std::path::Path;
//!
//! // Any companion file or the basename itself works.
//! let mut reader = AlignmentReader::open(Path::new("sample.entries")).unwrap();
//! let n_targets = reader.header().number_of_targets();
//!
//! for entry in reader.by_ref() {
//!     let entry = entry.unwrap();
//!     assert!(entry.target_index < n_targets);
//! }
//! reader.close();
//! ```
//!
use crate::ReaderOptions;
use crate::companion_path;
use crate::decoder::AlignmentEntries;
use crate::decoder::chunks::ChunkReader;
use crate::error::GobyError;
use crate::format::AlignmentEntry;
use crate::get_basename;
use crate::headers::alignment::Header;
use crate::headers::alignment::read_alignment_header;
use crate::headers::properties::Properties;
use crate::headers::properties::read_properties;
use crate::headers::tmh::TooManyHits;
use crate::headers::tmh::read_too_many_hits;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

pub struct AlignmentReader {
    // Inputs
    basename: PathBuf,

    header: Header,
    statistics: Properties,
    too_many_hits: TooManyHits,

    // Internals
    entries: AlignmentEntries<BufReader<File>>,
}

impl AlignmentReader {
    /// Opens the alignment `path` belongs to with the default [ReaderOptions].
    pub fn open(
        path: &Path,
    ) -> Result<Self, GobyError> {
        AlignmentReader::open_with_options(path, &ReaderOptions::default())
    }

    pub fn open_with_options(
        path: &Path,
        options: &ReaderOptions,
    ) -> Result<Self, GobyError> {
        let basename = get_basename(path);
        log::info!("Opening alignment {}", basename.display());

        let header = read_alignment_header(&companion_path(&basename, ".header"))?;
        let chunks = ChunkReader::open(&companion_path(&basename, ".entries"), options.delimiter)?;
        let statistics = read_properties(&companion_path(&basename, ".stats"))?;
        let too_many_hits = read_too_many_hits(&companion_path(&basename, ".tmh"))?;

        Ok(AlignmentReader {
            basename,
            header, statistics, too_many_hits,
            entries: AlignmentEntries::new(chunks),
        })
    }

    pub fn basename(
        &self,
    ) -> &Path {
        &self.basename
    }

    pub fn header(
        &self,
    ) -> &Header {
        &self.header
    }

    /// Contents of the `.stats` file, empty if there is none.
    pub fn statistics(
        &self,
    ) -> &Properties {
        &self.statistics
    }

    /// Contents of the `.tmh` file, empty if there is none.
    pub fn too_many_hits(
        &self,
    ) -> &TooManyHits {
        &self.too_many_hits
    }

    pub fn entries_read(
        &self,
    ) -> usize {
        self.entries.entries_read()
    }

    /// Closes the `.entries` file.
    pub fn close(
        self,
    ) {
        log::debug!("Closing {} after {} entries", self.basename.display(), self.entries.entries_read());
    }
}

impl Iterator for AlignmentReader {
    type Item = Result<AlignmentEntry, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        self.entries.next()
    }
}

impl std::iter::FusedIterator for AlignmentReader {}

// Tests
#[cfg(test)]
mod tests {
    use std::path::Path;

    fn write_alignment(basename: &Path, with_tmh: bool) {
        use crate::companion_path;
        use crate::compression::gzwrapper::deflate_bytes;
        use crate::fixtures::{alignment_entry, container};
        use crate::format::{AlignmentCollection, AlignmentHeader, AlignmentTooManyHits, AmbiguousLocation};
        use prost::Message;

        let header = AlignmentHeader { number_of_queries: Some(10), number_of_targets: Some(2), constant_query_length: Some(35), ..Default::default() };
        std::fs::write(companion_path(basename, ".header"), deflate_bytes(&header.encode_to_vec())).unwrap();

        let entries = container(&[
            AlignmentCollection { alignment_entries: vec![alignment_entry(0, 0, 10), alignment_entry(2, 1, 20)] },
            AlignmentCollection { alignment_entries: vec![alignment_entry(5, 1, 30)] },
        ]);
        std::fs::write(companion_path(basename, ".entries"), entries).unwrap();

        if with_tmh {
            let tmh = AlignmentTooManyHits { aligner_threshold: 4, hits: vec![AmbiguousLocation { query_index: 7, at_least_number_of_hits: 9, length_of_match: None }] };
            std::fs::write(companion_path(basename, ".tmh"), deflate_bytes(&tmh.encode_to_vec())).unwrap();
            std::fs::write(companion_path(basename, ".stats"), "number.of.entries=3\n").unwrap();
        }
    }

    #[test]
    fn open_alignment_with_all_companions() {
        use super::AlignmentReader;

        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("sample");
        write_alignment(&basename, true);

        let mut reader = AlignmentReader::open(&dir.path().join("sample.entries")).unwrap();

        assert_eq!(reader.basename(), basename.as_path());
        assert_eq!(reader.header().number_of_targets(), 2);
        assert_eq!(reader.statistics().get("number.of.entries"), Some("3"));
        assert!(reader.too_many_hits().is_query_ambiguous(7));

        let got: Vec<u32> = reader.by_ref().map(|x| x.unwrap().query_index).collect();
        assert_eq!(got, vec![0, 2, 5]);
        assert_eq!(reader.entries_read(), 3);
        reader.close();
    }

    #[test]
    fn optional_companions_may_be_missing() {
        use super::AlignmentReader;

        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("sample");
        write_alignment(&basename, false);

        let reader = AlignmentReader::open(&basename).unwrap();

        assert!(reader.too_many_hits().is_empty());
        assert!(reader.statistics().is_empty());
        assert_eq!(reader.count(), 3);
    }

    #[test]
    fn missing_header_fails_at_open() {
        use super::AlignmentReader;
        use crate::companion_path;
        use crate::error::GobyError;

        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("sample");
        write_alignment(&basename, false);
        std::fs::remove_file(companion_path(&basename, ".header")).unwrap();

        match AlignmentReader::open(&basename) {
            Err(GobyError::MissingRequiredFile { path }) => assert_eq!(path, companion_path(&basename, ".header")),
            Err(other) => panic!("expected MissingRequiredFile, got {}", other),
            Ok(_) => panic!("expected MissingRequiredFile"),
        }
    }

    #[test]
    fn missing_entries_fails_at_open() {
        use super::AlignmentReader;
        use crate::companion_path;
        use crate::error::GobyError;

        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("sample");
        write_alignment(&basename, true);
        std::fs::remove_file(companion_path(&basename, ".entries")).unwrap();

        assert!(matches!(AlignmentReader::open(&basename), Err(GobyError::MissingRequiredFile { .. })));
    }
}
