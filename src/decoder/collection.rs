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

//! Decoding inflated chunks into collections of entries.
//!
//! [Collection] ties a collection message to the entry type it holds, so that
//! the [EntryIterator](crate::decoder::EntryIterator) can be written once for
//! both reads and alignments. [Schema] selects one of the two at runtime, see
//! [Entries](crate::decoder::Entries).
//!
use crate::error::RecordError;
use crate::format::AlignmentCollection;
use crate::format::AlignmentEntry;
use crate::format::ReadCollection;
use crate::format::ReadEntry;
use crate::format::RequiredFields;
use crate::format::decode_checked;

/// A message that holds one chunk worth of entries.
pub trait Collection: prost::Message + Default + RequiredFields {
    type Entry;

    /// Message name used in error messages.
    const NAME: &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_entries(self) -> Vec<Self::Entry>;
}

impl Collection for ReadCollection {
    type Entry = ReadEntry;
    const NAME: &'static str = "ReadCollection";

    fn len(&self) -> usize {
        self.reads.len()
    }

    fn into_entries(self) -> Vec<ReadEntry> {
        self.reads
    }
}

impl Collection for AlignmentCollection {
    type Entry = AlignmentEntry;
    const NAME: &'static str = "AlignmentCollection";

    fn len(&self) -> usize {
        self.alignment_entries.len()
    }

    fn into_entries(self) -> Vec<AlignmentEntry> {
        self.alignment_entries
    }
}

/// Decode a complete collection from inflated chunk bytes.
///
/// Fails if the bytes do not decode or if any entry lacks a required field.
pub fn decode_collection<C: Collection>(
    bytes: &[u8],
) -> Result<C, RecordError> {
    decode_checked(bytes)
}

/// Supported chunked file schemas.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Schema {
    /// `.compact-reads` files.
    Reads,
    /// `.entries` files of an alignment.
    #[default]
    Alignments,
}

impl std::str::FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reads" => Ok(Schema::Reads),
            "alignments" => Ok(Schema::Alignments),
            _ => Err(format!("'{}' is not a valid Schema", s)),
        }
    }
}

impl Schema {
    /// Guess the schema from a file name.
    ///
    /// Returns None if the extension is not one Goby uses for chunked files.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".compact-reads") {
            Some(Schema::Reads)
        } else if name.ends_with(".entries") {
            Some(Schema::Alignments)
        } else {
            None
        }
    }
}

/// A single entry of either schema.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Read(ReadEntry),
    Alignment(AlignmentEntry),
}

impl Record {
    pub fn as_read(&self) -> Option<&ReadEntry> {
        match self {
            Record::Read(entry) => Some(entry),
            Record::Alignment(_) => None,
        }
    }

    pub fn as_alignment(&self) -> Option<&AlignmentEntry> {
        match self {
            Record::Read(_) => None,
            Record::Alignment(entry) => Some(entry),
        }
    }
}

impl From<ReadEntry> for Record {
    fn from(entry: ReadEntry) -> Self {
        Record::Read(entry)
    }
}

impl From<AlignmentEntry> for Record {
    fn from(entry: AlignmentEntry) -> Self {
        Record::Alignment(entry)
    }
}
