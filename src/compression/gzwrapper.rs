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
use std::io::Read;

use flate2::read::MultiGzDecoder;
use flate2::read::ZlibDecoder;

/// First two bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzipped(
    bytes: &[u8],
) -> bool {
    bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
}

/// Inflate a compressed chunk payload.
///
/// Payloads starting with the gzip magic bytes are read as (possibly
/// multi-member) gzip, anything else as a zlib stream.
///
pub fn inflate_bytes(
    deflated: &[u8],
) -> Result<Vec<u8>, std::io::Error> {
    let mut inflated: Vec<u8> = Vec::with_capacity(deflated.len() * 4);
    if is_gzipped(deflated) {
        let mut decoder = MultiGzDecoder::new(deflated);
        decoder.read_to_end(&mut inflated)?;
    } else {
        let mut decoder = ZlibDecoder::new(deflated);
        decoder.read_to_end(&mut inflated)?;
    }
    Ok(inflated)
}

/// Inflate `bytes` if they are gzipped, otherwise return them as is.
///
/// Used for companion files that older Goby releases stored uncompressed.
///
pub fn inflate_if_gzipped(
    bytes: Vec<u8>,
) -> Result<Vec<u8>, std::io::Error> {
    if is_gzipped(&bytes) {
        let mut inflated: Vec<u8> = Vec::with_capacity(bytes.len() * 4);
        MultiGzDecoder::new(bytes.as_slice()).read_to_end(&mut inflated)?;
        Ok(inflated)
    } else {
        Ok(bytes)
    }
}

#[cfg(test)]
pub(crate) fn deflate_bytes(
    bytes: &[u8],
) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}
