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

//! Chunk codecs and delimiter handling.
//!
//! Each frame of a chunked file starts with an 8 byte delimiter region. Files
//! written by the first Goby releases fill all 8 bytes with `0xFF`. Later
//! releases store the registration code of the chunk codec in the first byte
//! and fill the remaining 7 bytes with `0xFF`. The gzip codec registers as
//! `0xFF`, so both layouts look the same for gzip compressed chunks.
//!

pub mod gzwrapper;

/// Length of the delimiter region before each chunk length.
pub const DELIMITER_LENGTH: usize = 8;

/// Value of each delimiter byte after the codec registration code.
pub const DELIMITER_CONTENT: u8 = 0xFF;

/// Chunk codec named by the first byte of a delimiter region.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkCodec {
    /// Protocol buffer message compressed with gzip.
    #[default]
    Gzip,
    /// Goby's hybrid codec, which stores entries in a custom columnar encoding.
    Hybrid,
    /// Any other registration code.
    Other(u8),
}

impl ChunkCodec {
    pub fn from_u8(val: u8) -> Self {
        match val {
            0xFF => ChunkCodec::Gzip,
            0xFE => ChunkCodec::Hybrid,
            code => ChunkCodec::Other(code),
        }
    }

    pub fn to_u8(&self) -> u8 {
        match &self {
            ChunkCodec::Gzip => 0xFF,
            ChunkCodec::Hybrid => 0xFE,
            ChunkCodec::Other(code) => *code,
        }
    }
}

/// How the delimiter region before each chunk is treated.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelimiterPolicy {
    /// Skip the 8 bytes without looking at them.
    #[default]
    Skip,
    /// Require the gzip codec code followed by seven `0xFF` bytes.
    Strict,
}

impl std::str::FromStr for DelimiterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(DelimiterPolicy::Skip),
            "strict" => Ok(DelimiterPolicy::Strict),
            _ => Err(format!("'{}' is not a valid DelimiterPolicy", s)),
        }
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn codec_from_registration_code() {
        use super::ChunkCodec;

        assert_eq!(ChunkCodec::from_u8(0xFF), ChunkCodec::Gzip);
        assert_eq!(ChunkCodec::from_u8(0xFE), ChunkCodec::Hybrid);
        assert_eq!(ChunkCodec::from_u8(0x02), ChunkCodec::Other(0x02));
        assert_eq!(ChunkCodec::Other(0x02).to_u8(), 0x02);
        assert_eq!(ChunkCodec::Gzip.to_u8(), 0xFF);
    }

    #[test]
    fn delimiter_policy_from_str() {
        use super::DelimiterPolicy;

        assert_eq!("skip".parse::<DelimiterPolicy>().unwrap(), DelimiterPolicy::Skip);
        assert_eq!("strict".parse::<DelimiterPolicy>().unwrap(), DelimiterPolicy::Strict);
        assert!("lenient".parse::<DelimiterPolicy>().is_err());
    }
}
