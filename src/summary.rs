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

//! Aggregate statistics of reads and alignment entries.
//!
//! [ReadsSummary] and [AlignmentSummary] are filled one entry at a time and
//! can write a plain text report of what they have seen.
//!
use crate::error::GobyError;
use crate::format::AlignmentEntry;
use crate::format::ReadEntry;
use crate::headers::alignment::Header;
use crate::headers::alignment::LengthStats;
use crate::headers::tmh::TooManyHits;

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

type E = Box<dyn std::error::Error>;

/// Format `n` with thousands separators.
pub fn commify(
    n: u64,
) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    digits.chars().enumerate().for_each(|(idx, c)| {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    });
    out
}

// Zero instead of NaN when there is nothing to divide.
fn divide(
    a: f64,
    b: f64,
) -> f64 {
    if b == 0.0 { 0.0 } else { a / b }
}

/// Running min, max and total of a set of lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LengthCounter {
    pub count: u64,
    pub min: u32,
    pub max: u32,
    pub total: u64,
}

impl LengthCounter {
    pub fn add(
        &mut self,
        length: u32,
    ) {
        if self.count == 0 {
            self.min = length;
            self.max = length;
        } else {
            self.min = self.min.min(length);
            self.max = self.max.max(length);
        }
        self.count += 1;
        self.total += length as u64;
    }

    /// Adds the lengths counted in `other`.
    pub fn merge(
        &mut self,
        other: &LengthCounter,
    ) {
        if other.count == 0 {
            return
        }
        if self.count == 0 {
            self.min = other.min;
            self.max = other.max;
        } else {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
        self.count += other.count;
        self.total += other.total;
    }

    pub fn mean(
        &self,
    ) -> f64 {
        divide(self.total as f64, self.count as f64)
    }

    pub fn to_stats(
        &self,
    ) -> LengthStats {
        LengthStats { count: self.count as usize, min: self.min, max: self.max, mean: self.mean() }
    }
}

/// Statistics of the entries in a `.compact-reads` file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadsSummary {
    pub entries: u64,
    pub identifiers: u64,
    pub descriptions: u64,
    pub sequences: u64,
    pub quality_scores: u64,
    pub pairs: u64,
    pub lengths: LengthCounter,
}

impl ReadsSummary {
    pub fn add(
        &mut self,
        entry: &ReadEntry,
    ) {
        self.entries += 1;
        self.identifiers += entry.read_identifier.is_some() as u64;
        self.descriptions += entry.description.is_some() as u64;
        self.sequences += entry.sequence.as_ref().is_some_and(|x| !x.is_empty()) as u64;
        self.quality_scores += entry.quality_scores.as_ref().is_some_and(|x| !x.is_empty()) as u64;
        self.pairs += entry.sequence_pair.as_ref().is_some_and(|x| !x.is_empty()) as u64;
        self.lengths.add(entry.read_length);
    }

    /// Summarize all entries in `entries`, stopping at the first error.
    pub fn from_entries<I: Iterator<Item = Result<ReadEntry, GobyError>>>(
        entries: I,
    ) -> Result<Self, GobyError> {
        let mut summary = ReadsSummary::default();
        for entry in entries {
            summary.add(&entry?);
        }
        Ok(summary)
    }

    /// Write a report for the file at `path` that is `size` bytes long.
    pub fn write_report<W: Write>(
        &self,
        path: &Path,
        size: u64,
        conn: &mut W,
    ) -> Result<(), E> {
        writeln!(conn, "Compact reads filename = {}", path.display())?;
        writeln!(conn, "Average bytes per entry: {:.6}", divide(size as f64, self.entries as f64))?;
        writeln!(conn, "Average bytes per base: {:.6}", divide(size as f64, self.lengths.total as f64))?;
        writeln!(conn, "Has identifiers = {} ({})", self.identifiers > 0, commify(self.identifiers))?;
        writeln!(conn, "Has descriptions = {} ({})", self.descriptions > 0, commify(self.descriptions))?;
        writeln!(conn, "Has sequences = {} ({})", self.sequences > 0, commify(self.sequences))?;
        writeln!(conn, "Has quality scores = {} ({})", self.quality_scores > 0, commify(self.quality_scores))?;
        writeln!(conn, "Has paired sequences = {} ({})", self.pairs > 0, commify(self.pairs))?;
        writeln!(conn, "Number of entries = {}", commify(self.entries))?;
        writeln!(conn, "Min read length = {}", commify(self.lengths.min as u64))?;
        writeln!(conn, "Max read length = {}", commify(self.lengths.max as u64))?;
        writeln!(conn, "Avg read length = {}", commify(self.lengths.total.checked_div(self.lengths.count).unwrap_or(0)))?;
        writeln!(conn)?;
        Ok(())
    }
}

/// Statistics of the entries of a compact alignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignmentSummary {
    pub entries: u64,
    /// Entries weighted by their multiplicity.
    pub logical_entries: u64,
    pub max_query_index: Option<u32>,
    pub max_target_index: Option<u32>,
    pub total_score: f64,
    pub total_aligned_length: u64,
    pub variations: u64,
    /// Queries with at least one entry or listed in the `.tmh` file.
    pub matched_queries: HashSet<u32>,
    /// Query lengths stored in the entries themselves.
    pub query_lengths: LengthCounter,
}

impl AlignmentSummary {
    pub fn add(
        &mut self,
        entry: &AlignmentEntry,
    ) {
        self.entries += 1;
        self.logical_entries += entry.multiplicity() as u64;
        self.max_query_index = self.max_query_index.max(Some(entry.query_index));
        self.max_target_index = self.max_target_index.max(Some(entry.target_index));
        self.total_score += entry.score() as f64;
        self.total_aligned_length += entry.query_aligned_length() as u64;
        self.variations += entry.sequence_variations.len() as u64;
        self.matched_queries.insert(entry.query_index);
        if let Some(length) = entry.query_length {
            self.query_lengths.add(length);
        }
    }

    /// Count the queries listed in `tmh` as matched.
    pub fn add_too_many_hits(
        &mut self,
        tmh: &TooManyHits,
    ) {
        self.matched_queries.extend(tmh.queryindex_to_numhits.keys().copied());
    }

    pub fn from_entries<I: Iterator<Item = Result<AlignmentEntry, GobyError>>>(
        entries: I,
    ) -> Result<Self, GobyError> {
        let mut summary = AlignmentSummary::default();
        for entry in entries {
            summary.add(&entry?);
        }
        Ok(summary)
    }

    /// Number of query indices up to the largest one seen.
    pub fn query_indices(
        &self,
    ) -> u64 {
        self.max_query_index.map(|x| x as u64 + 1).unwrap_or(0)
    }

    pub fn target_indices(
        &self,
    ) -> u64 {
        self.max_target_index.map(|x| x as u64 + 1).unwrap_or(0)
    }

    pub fn mean_score(
        &self,
    ) -> f64 {
        divide(self.total_score, self.logical_entries as f64)
    }

    pub fn mean_aligned_length(
        &self,
    ) -> f64 {
        divide(self.total_aligned_length as f64, self.entries as f64)
    }

    pub fn percent_matched(
        &self,
    ) -> f64 {
        divide(self.matched_queries.len() as f64 * 100.0, self.query_indices() as f64)
    }

    pub fn variations_per_query(
        &self,
    ) -> f64 {
        divide(self.variations as f64, self.query_indices() as f64)
    }

    /// Write a report for the alignment at `basename`.
    ///
    /// `size` is the length of the `.entries` file in bytes.
    pub fn write_report<W: Write>(
        &self,
        basename: &Path,
        header: &Header,
        tmh: &TooManyHits,
        size: u64,
        conn: &mut W,
    ) -> Result<(), E> {
        let targets = header.target_length_stats();
        writeln!(conn, "Compact Alignment basename = {}", basename.display())?;
        writeln!(conn, "Info from header:")?;
        writeln!(conn, "Sorted: {}", header.is_sorted())?;
        writeln!(conn, "Indexed: {}", header.is_indexed())?;
        writeln!(conn, "Number of target sequences = {}", commify(header.number_of_targets() as u64))?;
        writeln!(conn, "Number of target length entries = {}", commify(header.message.target_length.len() as u64))?;
        writeln!(conn, "smallestSplitQueryIndex = {}", header.message.smallest_split_query_index())?;
        writeln!(conn, "largestSplitQueryIndex = {}", header.message.largest_split_query_index())?;
        writeln!(conn, "Min target length = {}", commify(targets.min as u64))?;
        writeln!(conn, "Max target length = {}", commify(targets.max as u64))?;
        writeln!(conn, "Mean target length = {:.2}", targets.mean)?;
        writeln!(conn)?;

        writeln!(conn, "Number of query sequences = {}", commify(header.number_of_queries() as u64))?;
        writeln!(conn, "Number of query length entries = {}", commify(header.message.query_length.len() as u64))?;
        writeln!(conn, "Constant query lengths = {}", header.constant_query_length().is_some())?;
        writeln!(conn, "Has query identifiers = {}", header.has_query_identifiers())?;
        writeln!(conn, "Has target identifiers = {}", header.has_target_identifiers())?;
        writeln!(conn)?;

        if !tmh.is_empty() {
            writeln!(conn, "TMH: aligner threshold = {}", commify(tmh.aligner_threshold as u64))?;
            writeln!(conn, "TMH: number of ambiguous matches = {}", commify(tmh.len() as u64))?;
            writeln!(conn, "TMH: %ambiguous matches = {:.6} %", divide(tmh.len() as f64 * 100.0, header.number_of_queries() as f64))?;
        }

        writeln!(conn, "num query indices = {}", commify(self.query_indices()))?;
        writeln!(conn, "num target indices = {}", commify(self.target_indices()))?;
        writeln!(conn, "Number of alignment entries = {}", commify(self.logical_entries))?;
        writeln!(conn, "Number of query indices that matched = {}", commify(self.matched_queries.len() as u64))?;
        writeln!(conn, "Percent matched = {:4.1} %", self.percent_matched())?;
        writeln!(conn, "Avg query alignment length = {:.6}", self.mean_aligned_length())?;
        writeln!(conn, "Avg score alignment = {:.6}", self.mean_score())?;
        writeln!(conn, "Avg number of variations per query sequence = {:.2}", self.variations_per_query())?;
        writeln!(conn, "Average bytes per entry = {:.6}", divide(size as f64, self.logical_entries as f64))?;

        let queries = if self.query_lengths.count > 0 {
            self.query_lengths.to_stats()
        } else {
            header.query_length_stats()
        };
        writeln!(conn, "Min query length = {}", commify(queries.min as u64))?;
        writeln!(conn, "Max query length = {}", commify(queries.max as u64))?;
        writeln!(conn, "Mean query length = {:.2}", queries.mean)?;
        writeln!(conn)?;
        Ok(())
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn commify_numbers() {
        use super::commify;

        assert_eq!(commify(0), "0");
        assert_eq!(commify(999), "999");
        assert_eq!(commify(1000), "1,000");
        assert_eq!(commify(1234567), "1,234,567");
    }

    #[test]
    fn merge_length_counters() {
        use super::LengthCounter;

        let mut total = LengthCounter::default();
        let mut first = LengthCounter::default();
        [5, 9].iter().for_each(|x| first.add(*x));
        let mut second = LengthCounter::default();
        [3, 7].iter().for_each(|x| second.add(*x));

        total.merge(&LengthCounter::default());
        total.merge(&first);
        total.merge(&second);

        assert_eq!(total, LengthCounter { count: 4, min: 3, max: 9, total: 24 });
    }

    #[test]
    fn summarize_reads() {
        use super::ReadsSummary;
        use crate::fixtures::read_entry;

        let mut described = read_entry(1, b"ACGTACGTAC");
        described.description = Some("read one".to_string());
        described.quality_scores = Some(vec![30; 10]);
        let entries = vec![read_entry(0, b"ACG"), described, read_entry(2, b"")];

        let got = ReadsSummary::from_entries(entries.into_iter().map(Ok)).unwrap();

        assert_eq!(got.entries, 3);
        assert_eq!(got.descriptions, 1);
        assert_eq!(got.identifiers, 0);
        assert_eq!(got.sequences, 2);
        assert_eq!(got.quality_scores, 1);
        assert_eq!(got.lengths.min, 0);
        assert_eq!(got.lengths.max, 10);
        assert_eq!(got.lengths.total, 13);
    }

    #[test]
    fn summarize_alignment_entries() {
        use super::AlignmentSummary;
        use crate::fixtures::alignment_entry;
        use crate::format::AlignmentTooManyHits;
        use crate::format::AmbiguousLocation;
        use crate::headers::tmh::TooManyHits;

        let mut repeated = alignment_entry(3, 1, 20);
        repeated.multiplicity = Some(3);
        let entries = vec![alignment_entry(0, 0, 10), repeated, alignment_entry(0, 2, 11)];

        let mut got = AlignmentSummary::from_entries(entries.into_iter().map(Ok)).unwrap();
        got.add_too_many_hits(&TooManyHits::from(AlignmentTooManyHits {
            aligner_threshold: 2,
            hits: vec![AmbiguousLocation { query_index: 1, at_least_number_of_hits: 5, length_of_match: None }],
        }));

        assert_eq!(got.entries, 3);
        assert_eq!(got.logical_entries, 5);
        assert_eq!(got.query_indices(), 4);
        assert_eq!(got.target_indices(), 3);
        assert_eq!(got.matched_queries.len(), 3);
        assert_eq!(got.variations, 3);
        assert_eq!(got.mean_aligned_length(), 35.0);
        assert_eq!(got.percent_matched(), 75.0);
        assert_eq!(got.query_lengths.count, 0);
    }

    #[test]
    fn empty_summaries_do_not_divide_by_zero() {
        use super::{AlignmentSummary, ReadsSummary};
        use crate::headers::alignment::Header;
        use crate::headers::tmh::TooManyHits;
        use std::path::Path;

        let mut reads: Vec<u8> = Vec::new();
        ReadsSummary::default().write_report(Path::new("empty.compact-reads"), 0, &mut reads).unwrap();
        let reads = String::from_utf8(reads).unwrap();
        assert!(reads.contains("Number of entries = 0"));
        assert!(reads.contains("Avg read length = 0"));

        let mut alignment: Vec<u8> = Vec::new();
        AlignmentSummary::default().write_report(Path::new("empty"), &Header::default(), &TooManyHits::default(), 0, &mut alignment).unwrap();
        let alignment = String::from_utf8(alignment).unwrap();
        assert!(alignment.contains("Number of alignment entries = 0"));
        assert!(alignment.contains("Mean query length = 0.00"));
        assert!(!alignment.contains("NaN"));
    }

    #[test]
    fn alignment_report_lists_sorted_and_indexed() {
        use super::AlignmentSummary;
        use crate::format::AlignmentHeader;
        use crate::headers::alignment::Header;
        use crate::headers::tmh::TooManyHits;
        use std::path::Path;

        let header = Header::new(AlignmentHeader { sorted: Some(true), number_of_targets: Some(4), ..Default::default() });

        let mut got: Vec<u8> = Vec::new();
        AlignmentSummary::default().write_report(Path::new("sample"), &header, &TooManyHits::default(), 0, &mut got).unwrap();
        let got = String::from_utf8(got).unwrap();

        assert!(got.contains("Info from header:\nSorted: true\nIndexed: false\n"));
        assert!(got.contains("Number of target sequences = 4"));
    }
}
