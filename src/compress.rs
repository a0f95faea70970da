use std::fmt;
use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Compression strategies supported for container payloads.
///
/// The wire identifies payloads by a [`CompressTag`], not by this enum: the
/// tag is what travels inside the metadata record, while `Compress` is the
/// local setting chosen when encoding.
///
/// The `br` tag is mapped to a raw DEFLATE stream (no zlib or gzip wrapper).
/// This is the single canonical interpretation of the tag; decoders must use
/// the same mapping, as accepting more than one algorithm under one tag
/// breaks round-tripping between encoders and decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compress {
    /// Store the payload uncompressed.
    None,
    /// Full gzip container around a DEFLATE stream. Tagged `gz` on the wire.
    Gzip {
        /// Compression level, 0-9.
        level: u32,
    },
    /// Raw DEFLATE stream. Tagged `br` on the wire.
    Deflate {
        /// Compression level, 0-9.
        level: u32,
    },
}

impl Compress {
    /// Gzip compression at the given level.
    pub fn new_gzip(level: u32) -> Self {
        Compress::Gzip { level }
    }

    /// Raw DEFLATE compression at the given level.
    pub fn new_deflate(level: u32) -> Self {
        Compress::Deflate { level }
    }

    /// Attempt to compress the data. Returns `Ok(None)` if this setting
    /// doesn't compress. All input is written before the stream is finished,
    /// and the stream is finished before the output is used.
    pub(crate) fn compress(&self, src: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
        match self {
            Compress::None => Ok(None),
            Compress::Gzip { level } => {
                let mut enc = GzEncoder::new(
                    Vec::with_capacity(src.len() / 2 + 64),
                    Compression::new(*level),
                );
                enc.write_all(src)?;
                Ok(Some(enc.finish()?))
            }
            Compress::Deflate { level } => {
                let mut enc = DeflateEncoder::new(
                    Vec::with_capacity(src.len() / 2 + 64),
                    Compression::new(*level),
                );
                enc.write_all(src)?;
                Ok(Some(enc.finish()?))
            }
        }
    }
}

impl Default for Compress {
    fn default() -> Self {
        Compress::Gzip { level: 6 }
    }
}

/// Decompress a payload according to its wire tag. Fails if the result in
/// the output would be greater than `max_size`, if the stream is corrupt, or
/// if the tag isn't a recognized codec.
pub(crate) fn decompress(tag: &CompressTag, src: &[u8], max_size: usize) -> Result<Vec<u8>> {
    match tag {
        CompressTag::None => {
            if src.len() > max_size {
                return Err(Error::LengthTooLong {
                    max: max_size,
                    actual: src.len(),
                });
            }
            Ok(src.to_vec())
        }
        CompressTag::Gz => inflate(GzDecoder::new(src), max_size),
        CompressTag::Br => inflate(DeflateDecoder::new(src), max_size),
        CompressTag::Other(tag) => Err(Error::UnsupportedCompression(tag.clone())),
    }
}

fn inflate<R: Read>(reader: R, max_size: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    // One byte past the cap is enough to detect an oversized stream without
    // letting a hostile container dictate the allocation.
    reader
        .take(max_size as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decode(e.to_string()))?;
    if out.len() > max_size {
        return Err(Error::LengthTooLong {
            max: max_size,
            actual: out.len(),
        });
    }
    Ok(out)
}

/// Codec identifier carried in the metadata record's `c` field.
///
/// Unrecognized tags survive metadata parsing as [`CompressTag::Other`] so
/// that a container with an unknown codec fails at payload dispatch with
/// [`Error::UnsupportedCompression`] rather than being rejected as malformed
/// metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompressTag {
    /// Payload stored uncompressed.
    None,
    /// Payload is a gzip container.
    Gz,
    /// Payload is a raw DEFLATE stream.
    Br,
    /// Tag this decoder does not implement. Kept verbatim for diagnostics.
    Other(String),
}

impl CompressTag {
    pub fn type_of(compress: &Compress) -> Self {
        match compress {
            Compress::None => CompressTag::None,
            Compress::Gzip { .. } => CompressTag::Gz,
            Compress::Deflate { .. } => CompressTag::Br,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CompressTag::None => "none",
            CompressTag::Gz => "gz",
            CompressTag::Br => "br",
            CompressTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for CompressTag {
    fn from(s: &str) -> Self {
        match s {
            "none" => CompressTag::None,
            "gz" => CompressTag::Gz,
            "br" => CompressTag::Br,
            other => CompressTag::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CompressTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompressTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CompressTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.as_str().into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn none_does_not_compress() {
        let result = Compress::None.compress(b"hello").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn gzip_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let compressed = Compress::new_gzip(6).compress(&data).unwrap().unwrap();
        assert!(compressed.len() < data.len());
        let restored = decompress(&CompressTag::Gz, &compressed, 1 << 20).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn deflate_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let compressed = Compress::new_deflate(6).compress(&data).unwrap().unwrap();
        assert!(compressed.len() < data.len());
        let restored = decompress(&CompressTag::Br, &compressed, 1 << 20).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn gzip_and_deflate_are_distinct_streams() {
        let data = b"payloads must not be interchangeable between tags";
        let gz = Compress::new_gzip(6).compress(data).unwrap().unwrap();
        // A gzip container is not a valid raw DEFLATE stream of the same
        // content, so decoding under the wrong tag must not round-trip.
        let wrong = decompress(&CompressTag::Br, &gz, 1 << 20);
        assert!(!matches!(wrong, Ok(ref v) if v == data));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = decompress(&CompressTag::Other("zzz".into()), b"anything", 1 << 20).unwrap_err();
        assert_eq!(err, Error::UnsupportedCompression("zzz".into()));
    }

    #[test]
    fn stored_payload_respects_size_cap() {
        let err = decompress(&CompressTag::None, &[0u8; 32], 16).unwrap_err();
        assert!(matches!(err, Error::LengthTooLong { max: 16, actual: 32 }));
    }

    #[test]
    fn inflate_respects_size_cap() {
        // Highly compressible input that would expand past the cap.
        let data = vec![0u8; 4096];
        let compressed = Compress::new_gzip(6).compress(&data).unwrap().unwrap();
        let err = decompress(&CompressTag::Gz, &compressed, 1024).unwrap_err();
        assert!(matches!(err, Error::LengthTooLong { max: 1024, .. }));
    }

    #[test]
    fn corrupt_stream_is_a_decode_error() {
        let err = decompress(&CompressTag::Gz, b"definitely not gzip", 1 << 20).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn tag_string_round_trip() {
        for tag in [
            CompressTag::None,
            CompressTag::Gz,
            CompressTag::Br,
            CompressTag::Other("zzz".into()),
        ] {
            assert_eq!(CompressTag::from(tag.as_str()), tag);
        }
    }

    #[test]
    fn tag_of_compress_setting() {
        assert_eq!(CompressTag::type_of(&Compress::None), CompressTag::None);
        assert_eq!(
            CompressTag::type_of(&Compress::new_gzip(3)),
            CompressTag::Gz
        );
        assert_eq!(
            CompressTag::type_of(&Compress::new_deflate(3)),
            CompressTag::Br
        );
    }

    #[test]
    fn empty_input_compresses_and_restores() {
        let compressed = Compress::default().compress(b"").unwrap().unwrap();
        let restored = decompress(&CompressTag::Gz, &compressed, 1 << 20).unwrap();
        assert!(restored.is_empty());
    }
}
