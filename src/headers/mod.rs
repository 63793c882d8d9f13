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

//! Companion files of an alignment.
//!
//! An alignment is stored as a set of files sharing a basename. Only the
//! `.entries` file is chunked. The other companions are read in one go:
//!
//! ## Header
//!
//! The `.header` file is a single gzip compressed
//! [AlignmentHeader](crate::format::AlignmentHeader) message. It holds
//!
//! - The number of queries and targets.
//! - Query and target lengths, or a single constant query length.
//! - Optional query and target identifiers.
//! - Information about the aligner that produced the entries.
//!
//! The header is required. Opening an alignment without one fails with
//! [MissingRequiredFile](crate::error::GobyError::MissingRequiredFile).
//!
//! ## Too many hits
//!
//! The `.tmh` file is a single
//! [AlignmentTooManyHits](crate::format::AlignmentTooManyHits) message listing
//! the queries the aligner dropped because they matched too many locations.
//! Current files gzip the message, older ones store it as is.
//!
//! ## Statistics
//!
//! The `.stats` file is a plain text properties file written alongside the
//! alignment.
//!
//! Both `.tmh` and `.stats` are optional. A missing file is logged as a warning
//! and read as empty.
//!

pub mod alignment;
pub mod properties;
pub mod tmh;

use crate::error::GobyError;

use std::path::Path;

// Reads the whole file at `path` into memory.
pub(crate) fn read_file_bytes(
    path: &Path,
) -> Result<Vec<u8>, GobyError> {
    let bytes = std::fs::read(path).map_err(|err| GobyError::from_open(path, err))?;
    log::info!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

// Like read_file_bytes, but a missing file is logged and returns None.
pub(crate) fn read_optional_file_bytes(
    path: &Path,
) -> Result<Option<Vec<u8>>, GobyError> {
    match read_file_bytes(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(GobyError::MissingRequiredFile { path }) => {
            let err = GobyError::MissingOptionalFile { path };
            log::warn!("{}", err);
            Ok(None)
        },
        Err(err) => Err(err),
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_optional_file_bytes_missing() {
        use super::read_optional_file_bytes;

        let dir = tempfile::tempdir().unwrap();
        let got = read_optional_file_bytes(&dir.path().join("sample.tmh")).unwrap();

        assert!(got.is_none());
    }

    #[test]
    fn read_file_bytes_missing() {
        use super::read_file_bytes;
        use crate::error::GobyError;

        let dir = tempfile::tempdir().unwrap();
        let got = read_file_bytes(&dir.path().join("sample.header"));

        assert!(matches!(got, Err(GobyError::MissingRequiredFile { .. })));
    }

    #[test]
    fn read_file_bytes_present() {
        use super::read_optional_file_bytes;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.stats");
        std::fs::write(&path, b"a=1\n").unwrap();

        assert_eq!(read_optional_file_bytes(&path).unwrap(), Some(b"a=1\n".to_vec()));
    }
}
