use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::compress::{self, Compress, CompressTag};
use crate::container::{self, SplitContainer};
use crate::error::{Error, Result};
use crate::metadata::{self, Format, Metadata, SCHEMA_VERSION};
use crate::{MAX_CONTAINER_SIZE, MAX_CONTENT_SIZE};

/// Encoder/decoder for self-describing content containers.
///
/// A `Codec` is a plain value constructed per use or handed in as a
/// dependency; it holds no shared state, so independent calls may run
/// concurrently without coordination. The default codec compresses with
/// gzip.
#[derive(Clone, Copy, Debug, Default)]
pub struct Codec {
    compress: Compress,
}

/// The result of a successful [`Codec::decode`]: the exact original text and
/// the parsed metadata record with all keys intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub content: String,
    pub metadata: Metadata,
}

impl Codec {
    /// A codec with an explicit compression setting.
    pub fn new(compress: Compress) -> Self {
        Self { compress }
    }

    /// A codec that stores payloads uncompressed.
    pub fn stored() -> Self {
        Self {
            compress: Compress::None,
        }
    }

    /// Encode text into a base64 transport string ready to be placed in a
    /// URL fragment.
    ///
    /// The payload is compressed per this codec's setting, framed with its
    /// metadata record, and base64-encoded with the standard alphabet. The
    /// result is deterministic apart from the metadata timestamp and
    /// round-trips bytewise through [`decode`][Self::decode].
    ///
    /// If the compression stream itself fails, the cause is logged and the
    /// payload is stored uncompressed under the `none` tag instead. Any
    /// other failure surfaces as [`Error::Compression`].
    pub fn encode(&self, text: &str, format: Format) -> Result<String> {
        let raw = text.as_bytes();
        if raw.len() > MAX_CONTENT_SIZE {
            return Err(Error::LengthTooLong {
                max: MAX_CONTENT_SIZE,
                actual: raw.len(),
            });
        }

        let (codec, payload) = match self.compress.compress(raw) {
            Ok(Some(compressed)) => (CompressTag::type_of(&self.compress), compressed),
            Ok(None) => (CompressTag::None, raw.to_vec()),
            Err(cause) => {
                tracing::warn!(%cause, "compression stream failed, storing payload uncompressed");
                (CompressTag::None, raw.to_vec())
            }
        };

        let original_size = raw.len() as u64;
        let stored_size = payload.len() as u64;
        let ratio = match codec {
            CompressTag::None => None,
            _ => metadata::ratio(original_size, stored_size),
        };
        let meta = Metadata {
            version: SCHEMA_VERSION,
            codec,
            format,
            original_size,
            stored_size,
            ratio,
            timestamp_ms: metadata::now_ms(),
        };
        let meta_json = serde_json::to_vec(&meta).map_err(|e| {
            tracing::error!(cause = %e, "metadata serialization failed");
            Error::Compression(e.to_string())
        })?;

        let container = container::build(&meta_json, &payload);
        Ok(BASE64.encode(container))
    }

    /// Decode a transport string back into its content and metadata.
    ///
    /// Decoding is all-or-nothing: every step either succeeds completely or
    /// fails with a distinguishable error, and no partially decoded content
    /// is ever returned. The payload length is validated against the
    /// metadata's `cs` claim, and payload decompression dispatches strictly
    /// on the metadata's `c` tag.
    pub fn decode(&self, transport: &str) -> Result<Decoded> {
        // A base64 string 4/3 the maximum container size can't decode to a
        // valid container; reject before allocating.
        if transport.len() > (MAX_CONTAINER_SIZE / 3 + 1) * 4 {
            return Err(Error::LengthTooLong {
                max: MAX_CONTAINER_SIZE,
                actual: transport.len() / 4 * 3,
            });
        }
        let bytes = BASE64
            .decode(transport)
            .map_err(|e| Error::Decode(e.to_string()))?;

        let split = SplitContainer::split(&bytes)?;
        let meta: Metadata = serde_json::from_slice(split.meta_raw)
            .map_err(|e| Error::MetadataParse(e.to_string()))?;
        if meta.version != SCHEMA_VERSION {
            return Err(Error::Decode(format!(
                "unsupported schema version {}",
                meta.version
            )));
        }
        if meta.stored_size != split.payload.len() as u64 {
            return Err(Error::Decode(format!(
                "payload is {} bytes but metadata claims {}",
                split.payload.len(),
                meta.stored_size
            )));
        }

        let content = compress::decompress(&meta.codec, split.payload, MAX_CONTENT_SIZE)?;
        let content = String::from_utf8(content).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(Decoded {
            content,
            metadata: meta,
        })
    }
}
