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

//! Low level reader for the frames of a chunked file.
//!
//! A chunked file is a sequence of frames:
//!
//! ```text
//! delimiter : 8 bytes
//! length    : u32, big endian
//! payload   : `length` bytes of compressed data
//! ```
//!
//! A frame with `length == 0` ends the file. Bytes after it are never read.
//!
use crate::compression::ChunkCodec;
use crate::compression::DelimiterPolicy;
use crate::compression::DELIMITER_CONTENT;
use crate::compression::DELIMITER_LENGTH;
use crate::compression::gzwrapper::inflate_bytes;
use crate::error::GobyError;

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

/// Size of the chunk length field.
pub const CHUNK_LENGTH_SIZE: usize = 4;

/// Inflated payload of one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Offset of the frame's delimiter region in the file.
    pub offset: u64,
    /// Bytes consumed by the frame, ie. delimiter + length field + payload.
    pub frame_len: u64,
    /// Codec named by the delimiter region.
    pub codec: ChunkCodec,
    /// Inflated payload.
    pub bytes: Vec<u8>,
}

pub struct ChunkReader<R: Read> {
    // Inputs
    conn: R,
    path: PathBuf,
    policy: DelimiterPolicy,

    // Internals
    offset: u64,
    chunks_read: usize,
    finished: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(
        conn: R,
    ) -> Self {
        ChunkReader::with_path(conn, Path::new("-"), DelimiterPolicy::default())
    }

    /// Creates a reader that names `path` in its errors.
    pub fn with_path(
        conn: R,
        path: &Path,
        policy: DelimiterPolicy,
    ) -> Self {
        ChunkReader {
            conn, path: path.to_path_buf(), policy,
            offset: 0, chunks_read: 0, finished: false,
        }
    }
}

impl ChunkReader<BufReader<File>> {
    /// Opens the chunked file at `path`.
    ///
    /// A missing file is reported as [MissingRequiredFile](GobyError::MissingRequiredFile).
    pub fn open(
        path: &Path,
        policy: DelimiterPolicy,
    ) -> Result<Self, GobyError> {
        let file = File::open(path).map_err(|err| GobyError::from_open(path, err))?;
        log::info!("Reading chunks from {}", path.display());
        Ok(ChunkReader::with_path(BufReader::new(file), path, policy))
    }
}

impl<R: Read> ChunkReader<R> {
    /// Reads, inflates and returns the next chunk.
    ///
    /// Returns `Ok(None)` at the terminating zero length frame or when the
    /// input ends before a complete delimiter and length field. Once the end
    /// has been reached, or an error has been returned, every further call
    /// returns `Ok(None)` without touching the input.
    ///
    pub fn next_chunk(
        &mut self,
    ) -> Result<Option<Chunk>, GobyError> {
        if self.finished {
            return Ok(None)
        }

        let start = self.offset;

        let mut delimiter: [u8; DELIMITER_LENGTH] = [0_u8; DELIMITER_LENGTH];
        if self.fill(&mut delimiter)? < DELIMITER_LENGTH {
            self.finished = true;
            return Ok(None)
        }
        let codec = match self.check_delimiter(start, &delimiter) {
            Ok(codec) => codec,
            Err(err) => {
                self.finished = true;
                return Err(err)
            },
        };

        let mut length_bytes: [u8; CHUNK_LENGTH_SIZE] = [0_u8; CHUNK_LENGTH_SIZE];
        if self.fill(&mut length_bytes)? < CHUNK_LENGTH_SIZE {
            self.finished = true;
            return Ok(None)
        }
        let declared = u32::from_be_bytes(length_bytes);
        if declared == 0 {
            log::debug!("End of chunks in {} at offset {}", self.path.display(), start);
            self.finished = true;
            return Ok(None)
        }

        let mut deflated: Vec<u8> = Vec::new();
        let got = match self.conn.by_ref().take(declared as u64).read_to_end(&mut deflated) {
            Ok(got) => got as u64,
            Err(err) => {
                self.finished = true;
                return Err(GobyError::Io { path: self.path.clone(), source: err })
            },
        };
        self.offset += got;
        if got < declared as u64 {
            self.finished = true;
            return Err(GobyError::TruncatedFrame { path: self.path.clone(), offset: start, declared, available: got })
        }

        let bytes = match inflate_bytes(&deflated) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.finished = true;
                return Err(GobyError::DecompressionError { path: self.path.clone(), offset: start, source: err })
            },
        };

        self.chunks_read += 1;
        log::debug!("Chunk {} at offset {}: {} bytes compressed, {} bytes inflated",
                    self.chunks_read, start, declared, bytes.len());

        Ok(Some(Chunk { offset: start, frame_len: self.offset - start, codec, bytes }))
    }

    /// Bytes consumed from the input so far.
    pub fn position(
        &self,
    ) -> u64 {
        self.offset
    }

    /// Number of chunks returned so far.
    pub fn chunks_read(
        &self,
    ) -> usize {
        self.chunks_read
    }

    pub fn is_finished(
        &self,
    ) -> bool {
        self.finished
    }

    pub fn path(
        &self,
    ) -> &Path {
        &self.path
    }

    pub fn into_inner(
        self,
    ) -> R {
        self.conn
    }

    // Reads until `buf` is full or the input ends, returns the number of bytes read.
    fn fill(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, GobyError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.conn.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.finished = true;
                    return Err(GobyError::Io { path: self.path.clone(), source: err })
                },
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn check_delimiter(
        &self,
        start: u64,
        delimiter: &[u8; DELIMITER_LENGTH],
    ) -> Result<ChunkCodec, GobyError> {
        let codec = ChunkCodec::from_u8(delimiter[0]);
        if self.policy == DelimiterPolicy::Skip {
            return Ok(codec)
        }

        if delimiter[1..].iter().any(|byte| *byte != DELIMITER_CONTENT) {
            return Err(GobyError::InvalidDelimiter { path: self.path.clone(), offset: start, found: *delimiter })
        }
        if codec != ChunkCodec::Gzip {
            return Err(GobyError::UnsupportedCodec { path: self.path.clone(), offset: start, code: delimiter[0] })
        }
        Ok(codec)
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk, GobyError>;

    fn next(
        &mut self,
    ) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for ChunkReader<R> {}
