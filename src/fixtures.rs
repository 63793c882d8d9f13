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

// Builders for chunked test data, written the way Goby's MessageChunksWriter
// lays out a file.

use crate::compression::gzwrapper::deflate_bytes;
use crate::compression::DELIMITER_CONTENT;
use crate::compression::DELIMITER_LENGTH;
use crate::format::AlignmentEntry;
use crate::format::ReadEntry;
use crate::format::SequenceVariation;

use prost::Message;

/// One frame holding `payload` as is.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = vec![DELIMITER_CONTENT; DELIMITER_LENGTH];
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// The zero length frame that ends a chunked file.
pub fn terminator() -> Vec<u8> {
    let mut out: Vec<u8> = vec![DELIMITER_CONTENT; DELIMITER_LENGTH];
    out.extend_from_slice(&0_u32.to_be_bytes());
    out
}

/// One frame holding the gzipped encoding of `message`.
pub fn message_frame<M: Message>(message: &M) -> Vec<u8> {
    frame(&deflate_bytes(&message.encode_to_vec()))
}

/// A complete chunked file with one frame per collection.
pub fn container<M: Message>(collections: &[M]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    collections.iter().for_each(|collection| out.append(&mut message_frame(collection)));
    out.append(&mut terminator());
    out
}

pub fn read_entry(read_index: u32, sequence: &[u8]) -> ReadEntry {
    ReadEntry {
        read_index,
        read_length: sequence.len() as u32,
        sequence: Some(sequence.to_vec()),
        ..Default::default()
    }
}

pub fn alignment_entry(query_index: u32, target_index: u32, position: u32) -> AlignmentEntry {
    AlignmentEntry {
        query_index,
        target_index,
        position,
        matching_reverse_strand: position % 2 == 1,
        score: Some(position as f32 + 0.5),
        query_aligned_length: Some(35),
        number_of_mismatches: Some(1),
        sequence_variations: vec![SequenceVariation {
            from: "A".to_string(),
            to: "C".to_string(),
            position: 4,
            read_index: 5,
            ..Default::default()
        }],
        ..Default::default()
    }
}
