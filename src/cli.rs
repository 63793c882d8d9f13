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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Statistics about .compact-reads files
    ReadsStats {
        // Input file(s)
        #[arg(group = "input", required = true, help = "Input .compact-reads file(s)")]
        input_files: Vec<PathBuf>,

        // Check the delimiter before each chunk
        #[arg(long = "strict-delimiters", default_value_t = false)]
        strict_delimiters: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Statistics about compact alignments
    AlignmentStats {
        // Basename or any companion file of each alignment
        #[arg(group = "input", required = true, help = "Alignment basename(s)")]
        basenames: Vec<PathBuf>,

        // Check the delimiter before each chunk
        #[arg(long = "strict-delimiters", default_value_t = false)]
        strict_delimiters: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Convert .compact-reads to FASTA or FASTQ
    ToFasta {
        // Input file
        #[arg(group = "input", required = true, help = "Input .compact-reads file")]
        input_file: PathBuf,

        // Output file path, defaults to the input with a .fasta or .fastq extension
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Write FASTQ instead of FASTA
        #[arg(long = "fastq", default_value_t = false)]
        fastq: bool,

        // Quality score encoding for FASTQ output
        #[arg(long = "quality-encoding", default_value = "illumina")]
        quality_encoding: String,

        // Write to stdout
        #[arg(short = 'c', long = "stdout", default_value_t = false)]
        write_to_stdout: bool,

        // Check the delimiter before each chunk
        #[arg(long = "strict-delimiters", default_value_t = false)]
        strict_delimiters: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
