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
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;

use goby::ReaderOptions;
use goby::alignments::AlignmentReader;
use goby::companion_path;
use goby::compression::DelimiterPolicy;
use goby::printer::Format;
use goby::printer::Printer;
use goby::printer::QualityEncoding;
use goby::reads::ReadsReader;
use goby::summary::AlignmentSummary;
use goby::summary::ReadsSummary;
use goby::summary::commify;

mod cli;

type E = Box<dyn std::error::Error>;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) -> Result<(), E> {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()?;
    Ok(())
}

fn reader_options(strict_delimiters: bool) -> ReaderOptions {
    ReaderOptions {
        delimiter: if strict_delimiters { DelimiterPolicy::Strict } else { DelimiterPolicy::Skip },
    }
}

fn reads_stats(
    input_files: &[PathBuf],
    options: &ReaderOptions,
) -> Result<(), E> {
    let mut conn_out = std::io::stdout().lock();

    let mut total = ReadsSummary::default();
    for file in input_files {
        let size = std::fs::metadata(file).map(|x| x.len()).unwrap_or(0);
        let reader = ReadsReader::open_with_options(file, options)?;
        let summary = ReadsSummary::from_entries(reader)?;
        summary.write_report(file, size, &mut conn_out)?;

        total.entries += summary.entries;
        total.lengths.merge(&summary.lengths);
    }

    writeln!(conn_out, "Total number of files processed = {}", commify(input_files.len() as u64))?;
    writeln!(conn_out, "Total number of reads = {}", commify(total.entries))?;
    writeln!(conn_out, "Min read length = {}", commify(total.lengths.min as u64))?;
    writeln!(conn_out, "Max read length = {}", commify(total.lengths.max as u64))?;
    writeln!(conn_out, "Avg read length = {}", commify(total.lengths.total.checked_div(total.lengths.count).unwrap_or(0)))?;
    conn_out.flush()?;
    Ok(())
}

fn alignment_stats(
    basenames: &[PathBuf],
    options: &ReaderOptions,
) -> Result<(), E> {
    let mut conn_out = std::io::stdout().lock();

    for basename in basenames {
        let mut reader = AlignmentReader::open_with_options(basename, options)?;
        let size = std::fs::metadata(companion_path(reader.basename(), ".entries")).map(|x| x.len()).unwrap_or(0);

        let mut summary = AlignmentSummary::from_entries(reader.by_ref())?;
        summary.add_too_many_hits(reader.too_many_hits());
        summary.write_report(reader.basename(), reader.header(), reader.too_many_hits(), size, &mut conn_out)?;
        reader.close();
    }
    conn_out.flush()?;
    Ok(())
}

fn to_fasta(
    input_file: &Path,
    out_file: Option<PathBuf>,
    format: Format,
    encoding: QualityEncoding,
    write_to_stdout: bool,
    options: &ReaderOptions,
) -> Result<(), E> {
    let mut reader = ReadsReader::open_with_options(input_file, options)?;

    let mut conn_out: Box<dyn Write> = if write_to_stdout {
        Box::new(BufWriter::new(std::io::stdout().lock()))
    } else {
        let out_path = out_file.unwrap_or_else(|| {
            input_file.with_extension(if format == Format::Fastq { "fastq" } else { "fasta" })
        });
        log::info!("Writing to {}", out_path.display());
        Box::new(BufWriter::new(File::create(out_path)?))
    };

    let mut printer = Printer::new(&mut reader, format, encoding);
    for record in printer.by_ref() {
        conn_out.write_all(&record?)?;
    }
    conn_out.flush()?;
    log::info!("Wrote {} records", printer.records_printed());
    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    let res: Result<(), E> = match &cli.command {
        // Reads statistics
        Some(cli::Commands::ReadsStats {
            input_files,
            strict_delimiters,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 }).and_then(|_| {
                reads_stats(input_files, &reader_options(*strict_delimiters))
            })
        },

        // Alignment statistics
        Some(cli::Commands::AlignmentStats {
            basenames,
            strict_delimiters,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 }).and_then(|_| {
                alignment_stats(basenames, &reader_options(*strict_delimiters))
            })
        },

        // Convert to FASTA or FASTQ
        Some(cli::Commands::ToFasta {
            input_file,
            out_file,
            fastq,
            quality_encoding,
            write_to_stdout,
            strict_delimiters,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 }).and_then(|_| {
                let format = if *fastq { Format::Fastq } else { Format::Fasta };
                let encoding = quality_encoding.parse::<QualityEncoding>()?;
                to_fasta(input_file, out_file.clone(), format, encoding, *write_to_stdout, &reader_options(*strict_delimiters))
            })
        },
        None => {
            eprintln!("goby: no subcommand given, see `goby --help`");
            std::process::exit(2);
        },
    };

    if let Err(err) = res {
        eprintln!("goby: {}", err);
        std::process::exit(1);
    }
}
