use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while encoding or decoding a content container.
///
/// Every failure inside the codec is caught at the public boundary and mapped
/// to one of these kinds. The underlying cause is carried along for
/// diagnostics; callers surfacing errors to an end user are expected to show
/// a single generic "failed to load content" state instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The encode path failed. Covers metadata serialization problems and any
    /// other internal error while building a container.
    Compression(String),
    /// The transport string or container is structurally invalid: bad base64,
    /// a truncated buffer, a payload that doesn't match the metadata claim,
    /// or content that isn't valid UTF-8 after decompression.
    Decode(String),
    /// The 4-byte length prefix claims more metadata bytes than the container
    /// holds past the prefix.
    InvalidMetadataLength { claimed: usize, available: usize },
    /// The metadata segment is not a valid JSON metadata record.
    MetadataParse(String),
    /// The metadata names a codec tag this decoder does not implement. Never
    /// downgraded to a pass-through decode.
    UnsupportedCompression(String),
    /// Content or container was larger than the maximum allowed size.
    LengthTooLong { max: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Compression(ref cause) => write!(f, "compression failed: {}", cause),
            Error::Decode(ref cause) => write!(f, "failed to decode container: {}", cause),
            Error::InvalidMetadataLength { claimed, available } => write!(
                f,
                "invalid metadata length: prefix claims {} bytes, container has {}",
                claimed, available
            ),
            Error::MetadataParse(ref cause) => {
                write!(f, "failed to parse metadata record: {}", cause)
            }
            Error::UnsupportedCompression(ref tag) => {
                write!(f, "unsupported compression tag \"{}\"", tag)
            }
            Error::LengthTooLong { max, actual } => write!(
                f,
                "data too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
        }
    }
}

impl std::error::Error for Error {}
