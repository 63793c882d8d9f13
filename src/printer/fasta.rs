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

/// Format a single read in FASTA format
///
/// Appends the header line and the wrapped sequence of `entry` to `out`.
///
pub fn format_fasta_record(
    entry: &ReadEntry,
    out: &mut Vec<u8>,
) {
    out.push(b'>');
    out.extend_from_slice(record_name(entry).as_bytes());
    out.push(b'\n');
    append_wrapped(read_sequence(entry), out);
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_fasta_record_with_description() {
        use super::format_fasta_record;
        use crate::fixtures::read_entry;

        let mut data = read_entry(7, b"ACGTTGCA");
        data.description = Some("ERR4035126.1262954 length=8".to_string());

        let expected: Vec<u8> = b">ERR4035126.1262954 length=8\nACGTTGCA\n".to_vec();

        let mut got: Vec<u8> = Vec::new();
        format_fasta_record(&data, &mut got);

        assert_eq!(got, expected);
    }

    #[test]
    fn format_fasta_record_long_sequence() {
        use super::format_fasta_record;
        use crate::fixtures::read_entry;

        let sequence: Vec<u8> = b"ACGT".iter().cycle().take(75).copied().collect();
        let data = read_entry(128, &sequence);

        let mut expected: Vec<u8> = b">128\n".to_vec();
        expected.extend_from_slice(&sequence[0..60]);
        expected.push(b'\n');
        expected.extend_from_slice(&sequence[60..75]);
        expected.push(b'\n');

        let mut got: Vec<u8> = Vec::new();
        format_fasta_record(&data, &mut got);

        assert_eq!(got, expected);
    }

    #[test]
    fn format_fasta_record_without_sequence() {
        use super::format_fasta_record;
        use crate::format::ReadEntry;

        let data = ReadEntry { read_index: 2, read_length: 0, ..Default::default() };

        let mut got: Vec<u8> = Vec::new();
        format_fasta_record(&data, &mut got);

        assert_eq!(got, b">2\n\n".to_vec());
    }
}
