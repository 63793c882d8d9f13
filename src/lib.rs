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

//! goby is a library and a command-line client for reading the compact file
//! formats of the [Goby](https://github.com/CampagneLaboratory/goby) framework:
//!
//!   - `.compact-reads` files that store sequencing reads.
//!   - Compact alignments, a set of files sharing a basename.
//!
//! The library is read-only. Writing compact files is not supported.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The goby CLI supports the following subcommands:
//!   - `goby reads-stats` print statistics about `.compact-reads` files.
//!   - `goby alignment-stats` print statistics about compact alignments.
//!   - `goby to-fasta` convert a `.compact-reads` file to FASTA or FASTQ.
//!
//! ### Rust API
//!
//! The API provides several functions for decoding a whole chunked stream
//! from a [Read]. For access to a single record at a time, the following
//! structs are provided:
//!
//!   - [ReadsReader](reads::ReadsReader): iterates over the [ReadEntry] records of a `.compact-reads` file.
//!   - [AlignmentReader](alignments::AlignmentReader): opens the companion files of an alignment and iterates over its [AlignmentEntry] records.
//!   - [EntryIterator](decoder::EntryIterator): iterates over the entries of any chunked [Read].
//!   - [ChunkReader](decoder::chunks::ChunkReader): returns the inflated chunks of a chunked [Read].
//!   - [Printer](printer::Printer): formats [ReadEntry] records as FASTA or FASTQ.
//!
//! ## File format
//!
//! Both `.compact-reads` and `.entries` files are chunked: a sequence of
//! frames, each holding one gzip compressed collection of entries.
//!
//! ```text
//! delimiter : 8 bytes
//! length    : u32, big endian
//! payload   : `length` bytes
//! ```
//!
//! A frame with length 0 ends the file. The first delimiter byte names the
//! codec of the chunk and the other 7 bytes are `0xFF`. By default the
//! delimiter is skipped without checking it, see [ReaderOptions].
//!
//! The inflated payload is a protocol buffer message defined in [format].
//!

use decoder::Entries;
use decoder::EntryIterator;
use decoder::chunks::ChunkReader;
use decoder::collection::Record;
use decoder::collection::Schema;
use compression::DelimiterPolicy;
use error::GobyError;
use format::AlignmentCollection;
use format::AlignmentEntry;
use format::ReadCollection;
use format::ReadEntry;

use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

pub mod alignments;
pub mod compression;
pub mod decoder;
pub mod error;
pub mod format;
pub mod headers;
pub mod printer;
pub mod reads;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

/// File extensions of the companion files of an alignment.
pub const ALIGNMENT_EXTENSIONS: [&str; 6] = [".entries", ".header", ".tmh", ".stats", ".counts", ".index"];

/// Options used when opening chunked files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// How the delimiter before each chunk is checked.
    pub delimiter: DelimiterPolicy,
}

/// Basename of the alignment `path` belongs to.
///
/// Removes one of the [alignment extensions](ALIGNMENT_EXTENSIONS) from the
/// end of `path`. Paths without one are returned as is.
///
/// ## Usage
///
/// ```rust
/// use goby::get_basename;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(get_basename(Path::new("data/sample.entries")), PathBuf::from("data/sample"));
/// assert_eq!(get_basename(Path::new("data/sample.tmh")), PathBuf::from("data/sample"));
/// assert_eq!(get_basename(Path::new("data/sample")), PathBuf::from("data/sample"));
/// ```
pub fn get_basename(
    path: &Path,
) -> PathBuf {
    if let Some(name) = path.to_str() {
        for ext in ALIGNMENT_EXTENSIONS {
            if let Some(stripped) = name.strip_suffix(ext) {
                return PathBuf::from(stripped)
            }
        }
    }
    path.to_path_buf()
}

/// Path of the companion file of `basename` with extension `extension`.
pub fn companion_path(
    basename: &Path,
    extension: &str,
) -> PathBuf {
    let mut path: OsString = basename.as_os_str().to_os_string();
    path.push(extension);
    PathBuf::from(path)
}

/// Read all entries from a chunked [Read] of schema `schema`.
///
/// Stops at the first error.
pub fn read_entries_from_read<R: Read>(
    conn: R,
    schema: Schema,
    options: &ReaderOptions,
) -> Result<Vec<Record>, GobyError> {
    let chunks = ChunkReader::with_path(conn, Path::new("-"), options.delimiter);
    Entries::new(chunks, schema).collect()
}

/// Decode all read entries from a `.compact-reads` stream.
///
/// ## Usage
///
/// ```rust
/// use goby::decode_reads_from_read;
/// use goby::format::{ReadCollection, ReadEntry};
/// use flate2::write::GzEncoder;
/// use flate2::Compression;
/// use prost::Message;
/// use std::io::Write;
///
/// let reads = vec![
///     ReadEntry { read_index: 0, read_length: 4, sequence: Some(b"ACGT".to_vec()), ..Default::default() },
///     ReadEntry { read_index: 1, read_length: 3, sequence: Some(b"GGA".to_vec()), ..Default::default() },
/// ];
///
/// // One chunk holding both reads
/// let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
/// encoder.write_all(&ReadCollection { reads: reads.clone() }.encode_to_vec()).unwrap();
/// let payload = encoder.finish().unwrap();
///
/// let mut data: Vec<u8> = vec![0xFF; 8];
/// data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
/// data.extend_from_slice(&payload);
///
/// // Terminating frame
/// data.extend_from_slice(&[0xFF; 8]);
/// data.extend_from_slice(&[0, 0, 0, 0]);
///
/// let got = decode_reads_from_read(data.as_slice()).unwrap();
///
/// assert_eq!(got, reads);
/// ```
pub fn decode_reads_from_read<R: Read>(
    conn: R,
) -> Result<Vec<ReadEntry>, GobyError> {
    EntryIterator::<R, ReadCollection>::new(ChunkReader::new(conn)).collect()
}

/// Decode all alignment entries from an `.entries` stream.
pub fn decode_alignments_from_read<R: Read>(
    conn: R,
) -> Result<Vec<AlignmentEntry>, GobyError> {
    EntryIterator::<R, AlignmentCollection>::new(ChunkReader::new(conn)).collect()
}
