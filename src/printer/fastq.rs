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
use crate::format::ReadEntry;
use crate::printer::append_wrapped;
use crate::printer::read_sequence;
use crate::printer::record_name;
use crate::printer::QualityEncoding;
use crate::printer::FAKE_QUALITY_SCORE;

/// Format a single read in FASTQ format
///
/// Appends the header line, the wrapped sequence and the wrapped quality
/// scores of `entry` to `out`. Positions without a stored score get
/// [FAKE_QUALITY_SCORE], so the quality line is never shorter than the
/// sequence.
///
pub fn format_fastq_record(
    entry: &ReadEntry,
    encoding: QualityEncoding,
    out: &mut Vec<u8>,
) {
    let sequence = read_sequence(entry);
    let scores: &[u8] = entry.quality_scores.as_deref().unwrap_or(&[]);

    out.push(b'@');
    out.extend_from_slice(record_name(entry).as_bytes());
    out.push(b'\n');
    append_wrapped(sequence, out);

    out.extend_from_slice(b"+\n");
    let length = scores.len().max(sequence.len());
    let encoded: Vec<u8> = (0..length).map(|idx| {
        encoding.encode(*scores.get(idx).unwrap_or(&FAKE_QUALITY_SCORE))
    }).collect();
    append_wrapped(&encoded, out);
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_fastq_record_with_scores() {
        use super::format_fastq_record;
        use crate::fixtures::read_entry;
        use crate::printer::QualityEncoding;

        let mut data = read_entry(5, b"ACGT");
        data.quality_scores = Some(vec![0, 10, 20, 30]);

        let expected: Vec<u8> = b"@5\nACGT\n+\n!+5?\n".to_vec();

        let mut got: Vec<u8> = Vec::new();
        format_fastq_record(&data, QualityEncoding::Sanger, &mut got);

        assert_eq!(got, expected);
    }

    #[test]
    fn format_fastq_record_fakes_missing_scores() {
        use super::format_fastq_record;
        use crate::fixtures::read_entry;
        use crate::printer::QualityEncoding;

        let mut data = read_entry(5, b"ACGTA");
        data.quality_scores = Some(vec![2, 2]);

        let expected: Vec<u8> = b"@5\nACGTA\n+\nBBhhh\n".to_vec();

        let mut got: Vec<u8> = Vec::new();
        format_fastq_record(&data, QualityEncoding::Illumina, &mut got);

        assert_eq!(got, expected);
    }
}
