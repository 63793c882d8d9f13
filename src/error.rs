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

//! Errors raised while reading Goby compact files.
//!
//! Reaching the end of a chunked file is not an error. The framing layer
//! returns `Ok(None)` and iterators return `None` when the data runs out.
//!
//! Every variant except [MissingOptionalFile](GobyError::MissingOptionalFile)
//! is fatal for the file it was raised on. MissingOptionalFile is recovered
//! by the companion file readers, which log a warning and continue with empty
//! data.
//!
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug)]
#[non_exhaustive]
pub enum GobyError {
    /// A frame declares more payload bytes than the file contains.
    TruncatedFrame {
        path: PathBuf,
        offset: u64,
        declared: u32,
        available: u64,
    },
    /// A chunk payload could not be inflated.
    DecompressionError {
        path: PathBuf,
        offset: u64,
        source: std::io::Error,
    },
    /// Inflated bytes do not decode as the expected message.
    MalformedRecord {
        path: PathBuf,
        offset: u64,
        message: &'static str,
        source: RecordError,
    },
    /// The delimiter region names a chunk codec this crate cannot read.
    UnsupportedCodec {
        path: PathBuf,
        offset: u64,
        code: u8,
    },
    /// The delimiter region is not filled with the delimiter byte.
    InvalidDelimiter {
        path: PathBuf,
        offset: u64,
        found: [u8; 8],
    },
    /// A companion file the reader cannot work without does not exist.
    MissingRequiredFile {
        path: PathBuf,
    },
    /// An optional companion file does not exist.
    MissingOptionalFile {
        path: PathBuf,
    },
    /// Any other I/O failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GobyError {
    /// Path of the file that caused the error.
    pub fn path(&self) -> &Path {
        match self {
            GobyError::TruncatedFrame { path, .. } => path,
            GobyError::DecompressionError { path, .. } => path,
            GobyError::MalformedRecord { path, .. } => path,
            GobyError::UnsupportedCodec { path, .. } => path,
            GobyError::InvalidDelimiter { path, .. } => path,
            GobyError::MissingRequiredFile { path } => path,
            GobyError::MissingOptionalFile { path } => path,
            GobyError::Io { path, .. } => path,
        }
    }

    /// Maps an error from opening `path` to MissingRequiredFile or Io.
    pub(crate) fn from_open(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            GobyError::MissingRequiredFile { path: path.to_path_buf() }
        } else {
            GobyError::Io { path: path.to_path_buf(), source: err }
        }
    }
}

impl std::fmt::Display for GobyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GobyError::TruncatedFrame { path, offset, declared, available } => {
                write!(f, "truncated frame in {} at offset {}: chunk declares {} bytes but only {} remain",
                       path.display(), offset, declared, available)
            },
            GobyError::DecompressionError { path, offset, source } => {
                write!(f, "could not inflate chunk in {} at offset {}: {}", path.display(), offset, source)
            },
            GobyError::MalformedRecord { path, offset, message, source } => {
                write!(f, "malformed {} in {} at offset {}: {}", message, path.display(), offset, source)
            },
            GobyError::UnsupportedCodec { path, offset, code } => {
                write!(f, "unsupported chunk codec {:#04x} in {} at offset {}", code, path.display(), offset)
            },
            GobyError::InvalidDelimiter { path, offset, found } => {
                write!(f, "invalid chunk delimiter {:02x?} in {} at offset {}", found, path.display(), offset)
            },
            GobyError::MissingRequiredFile { path } => {
                write!(f, "required file {} does not exist", path.display())
            },
            GobyError::MissingOptionalFile { path } => {
                write!(f, "optional file {} does not exist", path.display())
            },
            GobyError::Io { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            },
        }
    }
}

/// Why a message could not be accepted.
#[derive(Debug)]
pub enum RecordError {
    /// The bytes are not a valid protocol buffer message.
    Decode(prost::DecodeError),
    /// A field marked required in the schema is absent.
    MissingField {
        message: &'static str,
        field: &'static str,
    },
}

impl From<prost::DecodeError> for RecordError {
    fn from(err: prost::DecodeError) -> Self {
        RecordError::Decode(err)
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RecordError::Decode(err) => write!(f, "{}", err),
            RecordError::MissingField { message, field } => {
                write!(f, "missing required field {}.{}", message, field)
            },
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Decode(err) => Some(err),
            RecordError::MissingField { .. } => None,
        }
    }
}

impl std::error::Error for GobyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GobyError::DecompressionError { source, .. } => Some(source),
            GobyError::MalformedRecord { source, .. } => Some(source),
            GobyError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
