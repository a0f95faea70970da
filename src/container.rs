use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::MAX_CONTAINER_SIZE;

// Container format:
//  1. 4-byte little-endian length of the metadata JSON
//  2. The metadata JSON, UTF-8
//  3. The payload, exactly `cs` bytes per the metadata
//
// No padding between segments. The whole container is base64-encoded for
// transport and never persisted in binary form.

/// Assemble a container from an already-serialized metadata record and a
/// payload segment.
pub(crate) fn build(meta_json: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + meta_json.len() + payload.len());
    buf.extend_from_slice(&(meta_json.len() as u32).to_le_bytes());
    buf.extend_from_slice(meta_json);
    buf.extend_from_slice(payload);
    buf
}

/// Borrowed view of a container's segments.
#[derive(Debug)]
pub(crate) struct SplitContainer<'a> {
    pub meta_raw: &'a [u8],
    pub payload: &'a [u8],
}

impl<'a> SplitContainer<'a> {
    /// Split a raw container into its metadata and payload segments,
    /// validating the length prefix against the buffer before slicing.
    pub(crate) fn split(buf: &'a [u8]) -> Result<SplitContainer<'a>> {
        if buf.len() > MAX_CONTAINER_SIZE {
            return Err(Error::LengthTooLong {
                max: MAX_CONTAINER_SIZE,
                actual: buf.len(),
            });
        }
        if buf.len() < 4 {
            return Err(Error::Decode(format!(
                "container is {} bytes, shorter than the 4-byte length prefix",
                buf.len()
            )));
        }
        let (mut prefix, rest) = buf.split_at(4);
        let meta_len = prefix.read_u32::<LittleEndian>().unwrap() as usize; // Checked above
        if meta_len > rest.len() {
            return Err(Error::InvalidMetadataLength {
                claimed: meta_len,
                available: rest.len(),
            });
        }
        let (meta_raw, payload) = rest.split_at(meta_len);
        Ok(Self { meta_raw, payload })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn build_then_split() {
        let meta = br#"{"v":1}"#;
        let payload = b"payload bytes";
        let buf = build(meta, payload);
        assert_eq!(buf.len(), 4 + meta.len() + payload.len());
        assert_eq!(&buf[..4], &(meta.len() as u32).to_le_bytes());

        let split = SplitContainer::split(&buf).unwrap();
        assert_eq!(split.meta_raw, meta);
        assert_eq!(split.payload, payload);
    }

    #[test]
    fn empty_metadata_and_payload() {
        let buf = build(b"", b"");
        assert_eq!(buf, [0, 0, 0, 0]);
        let split = SplitContainer::split(&buf).unwrap();
        assert!(split.meta_raw.is_empty());
        assert!(split.payload.is_empty());
    }

    #[test]
    fn prefix_longer_than_buffer() {
        let mut buf = build(br#"{"v":1}"#, b"data");
        // Claim far more metadata than the container holds.
        buf[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = SplitContainer::split(&buf).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidMetadataLength {
                claimed: u32::MAX as usize,
                available: buf.len() - 4,
            }
        );
    }

    #[test]
    fn prefix_one_past_end() {
        let meta = br#"{"v":1}"#;
        let mut buf = build(meta, b"");
        buf[..4].copy_from_slice(&((meta.len() + 1) as u32).to_le_bytes());
        let err = SplitContainer::split(&buf).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadataLength { .. }));
    }

    #[test]
    fn truncated_prefix() {
        for len in 0..4 {
            let err = SplitContainer::split(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, Error::Decode(_)));
        }
    }

    #[test]
    fn oversized_container_is_rejected() {
        let buf = vec![0u8; MAX_CONTAINER_SIZE + 1];
        let err = SplitContainer::split(&buf).unwrap_err();
        assert!(matches!(err, Error::LengthTooLong { .. }));
    }
}
