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

//! Printer for outputting [ReadEntry] records as FASTA or FASTQ.
//!
//! Can be used to convert any iterator over decoded read entries, such as a
//! [ReadsReader](crate::reads::ReadsReader), to plain text.
//!
//! Returns 1 record at a time using next(). Errors from the input iterator
//! are passed through.
//!
//! Sequences and quality scores are wrapped at [LINE_LENGTH] characters. The
//! record name is the description of the read if it has one and the read
//! index otherwise.
//!
//! ## Usage
//!
//! ```rust
//! use goby::format::ReadEntry;
//! use goby::printer::{Format, Printer, QualityEncoding};
//!
//! let data = vec![
//!     ReadEntry { read_index: 0, read_length: 4, sequence: Some(b"ACGT".to_vec()), description: Some("r1".to_string()), ..Default::default() },
//!     ReadEntry { read_index: 1, read_length: 3, sequence: Some(b"GGA".to_vec()), quality_scores: Some(vec![30, 31, 32]), ..Default::default() },
//! ];
//!
//! // Printer expects the same items as a ReadsReader
//! let mut iter = data.into_iter().map(Ok);
//! let mut printer = Printer::new(&mut iter, Format::Fastq, QualityEncoding::Sanger);
//!
//! let mut output: Vec<u8> = Vec::new();
//! for record in printer.by_ref() {
//!     output.append(&mut record.unwrap());
//! }
//!
//! // Reads without quality scores get a fake score of 40
//! let expected: Vec<u8> = b"@r1\nACGT\n+\nIIII\n@1\nGGA\n+\n?@A\n".to_vec();
//!
//! assert_eq!(output, expected);
//! ```
//!

use crate::error::GobyError;
use crate::format::ReadEntry;

use fasta::format_fasta_record;
use fastq::format_fastq_record;

// Format specific implementations
pub mod fasta;
pub mod fastq;

/// Characters per line of sequence or quality scores.
pub const LINE_LENGTH: usize = 60;

/// Phred score written for bases that have no quality score.
pub const FAKE_QUALITY_SCORE: u8 = 40;

/// Supported plain text formats.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Fasta,
    Fastq,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fasta" => Ok(Format::Fasta),
            "fastq" => Ok(Format::Fastq),
            _ => Err(format!("'{}' is not a valid Format", s)),
        }
    }
}

/// ASCII encodings of Phred quality scores.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualityEncoding {
    /// Phred + 33.
    Sanger,
    /// Phred + 64.
    #[default]
    Illumina,
}

impl std::str::FromStr for QualityEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sanger" => Ok(QualityEncoding::Sanger),
            "illumina" => Ok(QualityEncoding::Illumina),
            _ => Err(format!("'{}' is not a valid QualityEncoding", s)),
        }
    }
}

impl QualityEncoding {
    pub fn offset(
        &self,
    ) -> u8 {
        match self {
            QualityEncoding::Sanger => 33,
            QualityEncoding::Illumina => 64,
        }
    }

    /// ASCII character for Phred score `score`.
    pub fn encode(
        &self,
        score: u8,
    ) -> u8 {
        score.saturating_add(self.offset())
    }
}

/// Name of the record written for `entry`.
pub fn record_name(
    entry: &ReadEntry,
) -> String {
    match &entry.description {
        Some(description) => description.clone(),
        None => entry.read_index.to_string(),
    }
}

/// The first `read_length` bases of the entry's sequence.
pub fn read_sequence(
    entry: &ReadEntry,
) -> &[u8] {
    match &entry.sequence {
        Some(sequence) => &sequence[0..sequence.len().min(entry.read_length as usize)],
        None => &[],
    }
}

// Appends `bytes` to `out` in lines of LINE_LENGTH characters.
pub(crate) fn append_wrapped(
    bytes: &[u8],
    out: &mut Vec<u8>,
) {
    bytes.chunks(LINE_LENGTH).for_each(|line| {
        out.extend_from_slice(line);
        out.push(b'\n');
    });
    if bytes.is_empty() {
        out.push(b'\n');
    }
}

pub struct Printer<'a, I: Iterator> where I: Iterator<Item=Result<ReadEntry, GobyError>> {
    // Inputs
    records: &'a mut I,

    pub format: Format,
    pub encoding: QualityEncoding,

    // Internals
    index: usize,
}

impl<'a, I: Iterator> Printer<'a, I> where I: Iterator<Item=Result<ReadEntry, GobyError>> {
    pub fn new(
        records: &'a mut I,
        format: Format,
        encoding: QualityEncoding,
    ) -> Self {
        Printer {
            records,
            format, encoding,
            index: 0,
        }
    }

    /// Number of records printed so far.
    pub fn records_printed(
        &self,
    ) -> usize {
        self.index
    }
}

impl<'a, I: Iterator> Iterator for Printer<'a, I> where I: Iterator<Item=Result<ReadEntry, GobyError>> {
    type Item = Result<Vec<u8>, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err)),
        };

        let mut out: Vec<u8> = Vec::new();
        match self.format {
            Format::Fasta => format_fasta_record(&record, &mut out),
            Format::Fastq => format_fastq_record(&record, self.encoding, &mut out),
        }
        self.index += 1;
        Some(Ok(out))
    }
}
