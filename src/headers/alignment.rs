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
use crate::format::AlignmentHeader;
use crate::format::IdentifierMapping;
use crate::format::decode_checked;
use crate::headers::read_file_bytes;

use std::collections::HashMap;
use std::path::Path;

/// Summary of a list of sequence lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LengthStats {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
}

impl LengthStats {
    /// Stats of `lengths`, all zero if the list is empty.
    pub fn from_lengths(
        lengths: &[u32],
    ) -> Self {
        if lengths.is_empty() {
            return LengthStats::default()
        }
        let sum: u64 = lengths.iter().map(|x| *x as u64).sum();
        LengthStats {
            count: lengths.len(),
            min: *lengths.iter().min().unwrap_or(&0),
            max: *lengths.iter().max().unwrap_or(&0),
            mean: sum as f64 / lengths.len() as f64,
        }
    }

    /// Stats of `count` sequences that all have length `length`.
    pub fn constant(
        count: usize,
        length: u32,
    ) -> Self {
        LengthStats { count, min: length, max: length, mean: length as f64 }
    }
}

/// Decoded `.header` of an alignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    pub message: AlignmentHeader,
}

fn names_by_index(
    mapping: &Option<IdentifierMapping>,
) -> HashMap<u32, String> {
    mapping.iter()
           .flat_map(|x| x.mappings.iter())
           .map(|info| (info.index, info.name.clone()))
           .collect()
}

impl Header {
    pub fn new(
        message: AlignmentHeader,
    ) -> Self {
        Header { message }
    }

    pub fn number_of_queries(
        &self,
    ) -> u32 {
        self.message.number_of_queries()
    }

    pub fn number_of_targets(
        &self,
    ) -> u32 {
        self.message.number_of_targets()
    }

    pub fn constant_query_length(
        &self,
    ) -> Option<u32> {
        self.message.constant_query_length
    }

    /// Length of query `query_index`, if the header stores one.
    pub fn query_length(
        &self,
        query_index: u32,
    ) -> Option<u32> {
        match self.message.constant_query_length {
            Some(length) => Some(length),
            None => self.message.query_length.get(query_index as usize).copied(),
        }
    }

    pub fn target_length(
        &self,
        target_index: u32,
    ) -> Option<u32> {
        self.message.target_length.get(target_index as usize).copied()
    }

    /// Min, max and mean query length.
    ///
    /// A constant query length applies to all `number_of_queries` queries.
    /// Otherwise the stats are computed from the stored per query lengths.
    pub fn query_length_stats(
        &self,
    ) -> LengthStats {
        match self.message.constant_query_length {
            Some(length) => LengthStats::constant(self.number_of_queries() as usize, length),
            None => LengthStats::from_lengths(&self.message.query_length),
        }
    }

    pub fn target_length_stats(
        &self,
    ) -> LengthStats {
        LengthStats::from_lengths(&self.message.target_length)
    }

    pub fn has_query_identifiers(
        &self,
    ) -> bool {
        self.message.query_name_mapping.as_ref().is_some_and(|x| !x.mappings.is_empty())
    }

    pub fn has_target_identifiers(
        &self,
    ) -> bool {
        self.message.target_name_mapping.as_ref().is_some_and(|x| !x.mappings.is_empty())
    }

    /// Query names keyed by query index.
    pub fn query_names(
        &self,
    ) -> HashMap<u32, String> {
        names_by_index(&self.message.query_name_mapping)
    }

    /// Target names keyed by target index.
    pub fn target_names(
        &self,
    ) -> HashMap<u32, String> {
        names_by_index(&self.message.target_name_mapping)
    }

    pub fn is_sorted(
        &self,
    ) -> bool {
        self.message.sorted()
    }

    pub fn is_indexed(
        &self,
    ) -> bool {
        self.message.indexed()
    }
}

/// Decode the contents of a `.header` file read from `path`.
pub fn decode_alignment_header(
    bytes: Vec<u8>,
    path: &Path,
) -> Result<Header, GobyError> {
    let inflated = inflate_if_gzipped(bytes).map_err(|err| {
        GobyError::DecompressionError { path: path.to_path_buf(), offset: 0, source: err }
    })?;
    let message: AlignmentHeader = decode_checked(inflated.as_slice()).map_err(|err| {
        GobyError::MalformedRecord { path: path.to_path_buf(), offset: 0, message: "AlignmentHeader", source: err }
    })?;
    Ok(Header::new(message))
}

/// Read the `.header` file at `path`.
pub fn read_alignment_header(
    path: &Path,
) -> Result<Header, GobyError> {
    let bytes = read_file_bytes(path)?;
    let header = decode_alignment_header(bytes, path)?;
    log::debug!("{} has {} queries and {} targets",
                path.display(), header.number_of_queries(), header.number_of_targets());
    Ok(header)
}
