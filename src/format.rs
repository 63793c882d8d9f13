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

//! Protocol buffer messages stored in Goby compact files.
//!
//! Tag numbers follow the `Reads.proto` and `Alignments.proto` schemas of the
//! Goby framework. Only the fields needed to read reads, alignment entries,
//! alignment headers and too many hits summaries are declared; unknown fields
//! in the input are skipped by the decoder.
//!
//! Optional fields are stored as [Option]. The derived getters (eg.
//! `entry.score()`) return the field default when the field is absent.
//!
//! prost does not check that `required` fields are present. Top level
//! messages implement [RequiredFields] and are decoded with [decode_checked],
//! which rejects messages that lack a required field anywhere in the tree.
//!
use crate::error::RecordError;

use prost::encoding::DecodeContext;
use prost::encoding::WireType;
use prost::encoding::decode_key;
use prost::encoding::decode_varint;
use prost::encoding::skip_field;

/// A batch of reads stored in one chunk of a `.compact-reads` file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadCollection {
    #[prost(message, repeated, tag = "1")]
    pub reads: Vec<ReadEntry>,
}

/// A single sequenced read.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadEntry {
    /// Index of the read in the input.
    #[prost(uint32, required, tag = "1")]
    pub read_index: u32,
    #[prost(uint32, optional, tag = "10")]
    pub barcode_index: Option<u32>,
    #[prost(string, optional, tag = "23")]
    pub read_identifier: Option<String>,
    #[prost(string, optional, tag = "22")]
    pub description: Option<String>,
    #[prost(uint32, required, tag = "2")]
    pub read_length: u32,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub sequence: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "5")]
    pub sequence_pair: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "6")]
    pub read_length_pair: Option<u32>,
    /// Phred scaled quality scores, one byte per base.
    #[prost(bytes = "vec", optional, tag = "4")]
    pub quality_scores: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "7")]
    pub quality_scores_pair: Option<Vec<u8>>,
}

/// A batch of alignment entries stored in one chunk of an `.entries` file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AlignmentCollection {
    #[prost(message, repeated, tag = "1")]
    pub alignment_entries: Vec<AlignmentEntry>,
}

/// Alignment of a query sequence against a target sequence.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AlignmentEntry {
    /// Number of logical entries represented by this message.
    #[prost(uint32, optional, tag = "7", default = "1")]
    pub multiplicity: Option<u32>,
    #[prost(uint32, required, tag = "1")]
    pub query_index: u32,
    #[prost(uint32, required, tag = "2")]
    pub target_index: u32,
    /// Zero based position of the alignment start on the target.
    #[prost(uint32, required, tag = "3")]
    pub position: u32,
    #[prost(bool, required, tag = "6")]
    pub matching_reverse_strand: bool,
    #[prost(uint32, optional, tag = "5")]
    pub query_position: Option<u32>,
    #[prost(float, optional, tag = "4")]
    pub score: Option<f32>,
    #[prost(uint32, optional, tag = "8")]
    pub number_of_mismatches: Option<u32>,
    #[prost(uint32, optional, tag = "9")]
    pub number_of_indels: Option<u32>,
    #[prost(uint32, optional, tag = "11")]
    pub query_aligned_length: Option<u32>,
    #[prost(uint32, optional, tag = "12")]
    pub target_aligned_length: Option<u32>,
    #[prost(message, repeated, tag = "13")]
    pub sequence_variations: Vec<SequenceVariation>,
    #[prost(uint32, optional, tag = "10")]
    pub query_length: Option<u32>,
    #[prost(int32, optional, tag = "14")]
    pub mapping_quality: Option<i32>,
    #[prost(uint32, optional, tag = "15")]
    pub pair_flags: Option<u32>,
    #[prost(uint32, optional, tag = "17")]
    pub fragment_index: Option<u32>,
    #[prost(uint32, optional, tag = "21")]
    pub insert_size: Option<u32>,
    #[prost(uint32, optional, tag = "22")]
    pub sample_index: Option<u32>,
    #[prost(uint32, optional, tag = "24")]
    pub ambiguity: Option<u32>,
}

/// A difference between the query and the target within an alignment.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SequenceVariation {
    /// Bases on the target.
    #[prost(string, required, tag = "1")]
    pub from: String,
    /// Bases on the query.
    #[prost(string, required, tag = "2")]
    pub to: String,
    /// Position on the target, relative to the alignment start.
    #[prost(uint32, required, tag = "3")]
    pub position: u32,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub to_quality: Option<Vec<u8>>,
    /// Position on the read.
    #[prost(uint32, required, tag = "5")]
    pub read_index: u32,
}

/// Metadata stored in the `.header` file of an alignment.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AlignmentHeader {
    #[prost(message, optional, tag = "1")]
    pub query_name_mapping: Option<IdentifierMapping>,
    #[prost(message, optional, tag = "2")]
    pub target_name_mapping: Option<IdentifierMapping>,
    #[prost(uint32, optional, tag = "3")]
    pub number_of_queries: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub number_of_targets: Option<u32>,
    #[prost(uint32, optional, tag = "5")]
    pub number_of_aligned_reads: Option<u32>,
    #[prost(uint32, repeated, tag = "6")]
    pub query_length: Vec<u32>,
    #[prost(uint32, repeated, tag = "7")]
    pub target_length: Vec<u32>,
    #[prost(uint32, optional, tag = "9")]
    pub smallest_split_query_index: Option<u32>,
    /// Set instead of `query_length` when every query has the same length.
    #[prost(uint32, optional, tag = "10")]
    pub constant_query_length: Option<u32>,
    #[prost(uint32, optional, tag = "11")]
    pub largest_split_query_index: Option<u32>,
    #[prost(bool, optional, tag = "13")]
    pub sorted: Option<bool>,
    #[prost(bool, optional, tag = "14")]
    pub indexed: Option<bool>,
    #[prost(bool, optional, tag = "15")]
    pub query_lengths_stored_in_entries: Option<bool>,
    #[prost(string, optional, tag = "17")]
    pub aligner_name: Option<String>,
    #[prost(string, optional, tag = "18")]
    pub aligner_version: Option<String>,
    #[prost(string, optional, tag = "25")]
    pub version: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IdentifierMapping {
    #[prost(message, repeated, tag = "1")]
    pub mappings: Vec<IdentifierInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IdentifierInfo {
    #[prost(string, required, tag = "1")]
    pub name: String,
    #[prost(uint32, required, tag = "2")]
    pub index: u32,
}

/// Contents of the `.tmh` file of an alignment.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AlignmentTooManyHits {
    /// Number of hits above which the aligner dropped a query.
    #[prost(uint32, required, tag = "1")]
    pub aligner_threshold: u32,
    #[prost(message, repeated, tag = "2")]
    pub hits: Vec<AmbiguousLocation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AmbiguousLocation {
    #[prost(uint32, required, tag = "1")]
    pub query_index: u32,
    #[prost(uint32, required, tag = "2")]
    pub at_least_number_of_hits: u32,
    #[prost(uint32, optional, tag = "3")]
    pub length_of_match: Option<u32>,
}

/// Required fields of a message and of the messages nested in it.
#[derive(Debug)]
pub struct Layout {
    pub name: &'static str,
    /// Tag and name of each required field.
    pub required: &'static [(u32, &'static str)],
    /// Tag and layout of each message typed field.
    pub nested: &'static [(u32, &'static Layout)],
}

const SEQUENCE_VARIATION: Layout = Layout {
    name: "SequenceVariation",
    required: &[(1, "from"), (2, "to"), (3, "position"), (5, "read_index")],
    nested: &[],
};

const ALIGNMENT_ENTRY: Layout = Layout {
    name: "AlignmentEntry",
    required: &[(1, "query_index"), (2, "target_index"), (3, "position"), (6, "matching_reverse_strand")],
    nested: &[(13, &SEQUENCE_VARIATION)],
};

const READ_ENTRY: Layout = Layout {
    name: "ReadEntry",
    required: &[(1, "read_index"), (2, "read_length")],
    nested: &[],
};

const IDENTIFIER_INFO: Layout = Layout {
    name: "IdentifierInfo",
    required: &[(1, "name"), (2, "index")],
    nested: &[],
};

const IDENTIFIER_MAPPING: Layout = Layout {
    name: "IdentifierMapping",
    required: &[],
    nested: &[(1, &IDENTIFIER_INFO)],
};

const AMBIGUOUS_LOCATION: Layout = Layout {
    name: "AmbiguousLocation",
    required: &[(1, "query_index"), (2, "at_least_number_of_hits")],
    nested: &[],
};

/// A message with a [Layout] that can be checked against its encoded bytes.
pub trait RequiredFields {
    const LAYOUT: Layout;
}

impl RequiredFields for ReadCollection {
    const LAYOUT: Layout = Layout { name: "ReadCollection", required: &[], nested: &[(1, &READ_ENTRY)] };
}

impl RequiredFields for AlignmentCollection {
    const LAYOUT: Layout = Layout { name: "AlignmentCollection", required: &[], nested: &[(1, &ALIGNMENT_ENTRY)] };
}

impl RequiredFields for AlignmentHeader {
    const LAYOUT: Layout = Layout {
        name: "AlignmentHeader",
        required: &[],
        nested: &[(1, &IDENTIFIER_MAPPING), (2, &IDENTIFIER_MAPPING)],
    };
}

impl RequiredFields for AlignmentTooManyHits {
    const LAYOUT: Layout = Layout {
        name: "AlignmentTooManyHits",
        required: &[(1, "aligner_threshold")],
        nested: &[(2, &AMBIGUOUS_LOCATION)],
    };
}

/// Check that every required field of `layout` is present in `bytes`.
///
/// Walks the wire format of the message, descending into message typed
/// fields listed in the layout.
pub fn check_required(
    bytes: &[u8],
    layout: &Layout,
) -> Result<(), RecordError> {
    let mut seen: Vec<bool> = vec![false; layout.required.len()];
    let mut buf: &[u8] = bytes;

    while !buf.is_empty() {
        let (tag, wire_type) = decode_key(&mut buf)?;
        let mut field: &[u8] = buf;
        skip_field(wire_type, tag, &mut buf, DecodeContext::default())?;

        if let Some(pos) = layout.required.iter().position(|(required, _)| *required == tag) {
            seen[pos] = true;
        }

        if wire_type == WireType::LengthDelimited {
            if let Some((_, nested)) = layout.nested.iter().find(|(nested, _)| *nested == tag) {
                let len = decode_varint(&mut field)? as usize;
                check_required(&field[..len], nested)?;
            }
        }
    }

    match seen.iter().position(|x| !x) {
        Some(pos) => Err(RecordError::MissingField { message: layout.name, field: layout.required[pos].1 }),
        None => Ok(()),
    }
}

/// Decode a message and check that its required fields are present.
pub fn decode_checked<M: prost::Message + Default + RequiredFields>(
    bytes: &[u8],
) -> Result<M, RecordError> {
    let message = M::decode(bytes)?;
    check_required(bytes, &M::LAYOUT)?;
    Ok(message)
}
