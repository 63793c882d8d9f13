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
use crate::compression::gzwrapper::inflate_if_gzipped;
use crate::error::GobyError;
use crate::format::AlignmentTooManyHits;
use crate::format::decode_checked;
use crate::headers::read_optional_file_bytes;

use std::collections::HashMap;
use std::path::Path;

/// Queries the aligner dropped for matching too many locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TooManyHits {
    pub aligner_threshold: u32,
    /// Lower bound on the number of hits of each listed query.
    pub queryindex_to_numhits: HashMap<u32, u32>,
    /// Length of the match that produced the hits, when the aligner stored one.
    pub queryindex_to_depth: HashMap<u32, u32>,
}

impl From<AlignmentTooManyHits> for TooManyHits {
    fn from(message: AlignmentTooManyHits) -> Self {
        let mut tmh = TooManyHits { aligner_threshold: message.aligner_threshold, ..Default::default() };
        // Later hits for the same query replace earlier ones.
        message.hits.iter().for_each(|hit| {
            tmh.queryindex_to_numhits.insert(hit.query_index, hit.at_least_number_of_hits);
            if let Some(length) = hit.length_of_match {
                tmh.queryindex_to_depth.insert(hit.query_index, length);
            }
        });
        tmh
    }
}

impl TooManyHits {
    pub fn is_empty(
        &self,
    ) -> bool {
        self.queryindex_to_numhits.is_empty()
    }

    pub fn len(
        &self,
    ) -> usize {
        self.queryindex_to_numhits.len()
    }

    /// Indices of all listed queries in ascending order.
    pub fn query_indices(
        &self,
    ) -> Vec<u32> {
        let mut indices: Vec<u32> = self.queryindex_to_numhits.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn number_of_hits(
        &self,
        query_index: u32,
    ) -> Option<u32> {
        self.queryindex_to_numhits.get(&query_index).copied()
    }

    pub fn length_of_match(
        &self,
        query_index: u32,
    ) -> Option<u32> {
        self.queryindex_to_depth.get(&query_index).copied()
    }

    pub fn is_query_ambiguous(
        &self,
        query_index: u32,
    ) -> bool {
        self.queryindex_to_numhits.contains_key(&query_index)
    }

    /// Whether `query_index` matches at least `k` locations.
    ///
    /// At or above the aligner threshold any listed query counts as
    /// ambiguous. Below it the stored lower bound must reach `k`.
    pub fn is_query_ambiguous_at(
        &self,
        query_index: u32,
        k: u32,
    ) -> bool {
        if k >= self.aligner_threshold {
            self.is_query_ambiguous(query_index)
        } else {
            self.number_of_hits(query_index).is_some_and(|hits| hits >= k)
        }
    }

    /// Like [is_query_ambiguous_at](Self::is_query_ambiguous_at), but a match
    /// shorter than the stored match length is always ambiguous.
    pub fn is_query_ambiguous_with_length(
        &self,
        query_index: u32,
        k: u32,
        match_length: u32,
    ) -> bool {
        if self.length_of_match(query_index).is_some_and(|length| match_length < length) {
            true
        } else {
            self.is_query_ambiguous_at(query_index, k)
        }
    }
}

/// Decode the contents of a `.tmh` file, gzipped or not.
pub fn decode_too_many_hits(
    bytes: Vec<u8>,
    path: &Path,
) -> Result<TooManyHits, GobyError> {
    let inflated = inflate_if_gzipped(bytes).map_err(|err| {
        GobyError::DecompressionError { path: path.to_path_buf(), offset: 0, source: err }
    })?;
    let message: AlignmentTooManyHits = decode_checked(inflated.as_slice()).map_err(|err| {
        GobyError::MalformedRecord { path: path.to_path_buf(), offset: 0, message: "AlignmentTooManyHits", source: err }
    })?;
    Ok(TooManyHits::from(message))
}

/// Read the `.tmh` file at `path`.
///
/// A missing file is logged and read as an empty [TooManyHits].
pub fn read_too_many_hits(
    path: &Path,
) -> Result<TooManyHits, GobyError> {
    match read_optional_file_bytes(path)? {
        Some(bytes) => {
            let tmh = decode_too_many_hits(bytes, path)?;
            log::debug!("{} lists {} queries with threshold {}", path.display(), tmh.len(), tmh.aligner_threshold);
            Ok(tmh)
        },
        None => Ok(TooManyHits::default()),
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn location(query_index: u32, at_least: u32, length: Option<u32>) -> crate::format::AmbiguousLocation {
        crate::format::AmbiguousLocation { query_index, at_least_number_of_hits: at_least, length_of_match: length }
    }

    #[test]
    fn duplicate_queries_last_write_wins() {
        use super::TooManyHits;
        use crate::format::AlignmentTooManyHits;
        use std::collections::HashMap;

        let message = AlignmentTooManyHits { aligner_threshold: 10, hits: vec![location(5, 12, None), location(5, 12, None)] };
        let got = TooManyHits::from(message);

        let expected: HashMap<u32, u32> = HashMap::from([(5, 12)]);
        assert_eq!(got.queryindex_to_numhits, expected);
        assert!(got.queryindex_to_depth.is_empty());
    }

    #[test]
    fn ambiguity_below_and_above_threshold() {
        use super::TooManyHits;
        use crate::format::AlignmentTooManyHits;

        let tmh = TooManyHits::from(AlignmentTooManyHits { aligner_threshold: 5, hits: vec![location(1, 3, None), location(2, 8, Some(20))] });

        assert!(tmh.is_query_ambiguous(1));
        assert!(!tmh.is_query_ambiguous(7));

        assert!(tmh.is_query_ambiguous_at(1, 3));
        assert!(!tmh.is_query_ambiguous_at(1, 4));
        assert!(tmh.is_query_ambiguous_at(1, 5));
        assert!(!tmh.is_query_ambiguous_at(7, 5));
        assert!(!tmh.is_query_ambiguous_at(7, 1));

        assert!(tmh.is_query_ambiguous_with_length(2, 9, 19));
        assert!(tmh.is_query_ambiguous_with_length(2, 2, 25));
        assert!(!tmh.is_query_ambiguous_with_length(1, 4, 10));

        assert_eq!(tmh.query_indices(), vec![1, 2]);
        assert_eq!(tmh.length_of_match(2), Some(20));
        assert_eq!(tmh.number_of_hits(3), None);
    }

    #[test]
    fn missing_tmh_file_is_empty() {
        use super::read_too_many_hits;

        let dir = tempfile::tempdir().unwrap();
        let got = read_too_many_hits(&dir.path().join("sample.tmh")).unwrap();

        assert!(got.is_empty());
        assert!(got.queryindex_to_depth.is_empty());
    }

    #[test]
    fn read_gzipped_and_plain_tmh_files() {
        use super::read_too_many_hits;
        use crate::compression::gzwrapper::deflate_bytes;
        use crate::format::AlignmentTooManyHits;
        use prost::Message;

        let dir = tempfile::tempdir().unwrap();
        let message = AlignmentTooManyHits { aligner_threshold: 2, hits: vec![location(4, 6, Some(30))] };

        let gzipped = dir.path().join("gzipped.tmh");
        std::fs::write(&gzipped, deflate_bytes(&message.encode_to_vec())).unwrap();
        let plain = dir.path().join("plain.tmh");
        std::fs::write(&plain, message.encode_to_vec()).unwrap();

        let got_gzipped = read_too_many_hits(&gzipped).unwrap();
        let got_plain = read_too_many_hits(&plain).unwrap();

        assert_eq!(got_gzipped, got_plain);
        assert_eq!(got_gzipped.aligner_threshold, 2);
        assert_eq!(got_gzipped.number_of_hits(4), Some(6));
        assert_eq!(got_gzipped.length_of_match(4), Some(30));
    }

    #[test]
    fn tmh_without_threshold_is_malformed() {
        use super::decode_too_many_hits;
        use crate::error::{GobyError, RecordError};
        use std::path::Path;

        // hits { query_index: 1, at_least_number_of_hits: 3 } without aligner_threshold.
        let bytes: Vec<u8> = vec![0x12, 0x04, 0x08, 0x01, 0x10, 0x03];

        let got = decode_too_many_hits(bytes, Path::new("sample.tmh"));

        assert!(matches!(got, Err(GobyError::MalformedRecord { message: "AlignmentTooManyHits", source: RecordError::MissingField { field: "aligner_threshold", .. }, .. })));
    }
}
