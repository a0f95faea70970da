//! frag-pack packs arbitrary textual content (HTML, Markdown, JSON, plain
//! text) into a compact, self-describing binary container carried as a
//! base64 string, small enough to live in a URL fragment. The same crate
//! decodes that string back into the original text plus its metadata, and
//! must do so losslessly while tolerating malformed or adversarial input.
//!
//! The container is a fixed framing with no padding:
//!
//! 1. A 4-byte little-endian length of the metadata JSON.
//! 2. The metadata record as UTF-8 JSON: schema version, codec tag, format
//!    tag, original and stored sizes, an optional percent-saved ratio, and a
//!    creation timestamp.
//! 3. The payload, compressed per the codec tag.
//!
//! Three codec tags are supported: `none` (stored), `gz` (gzip), and `br`
//! (a raw DEFLATE stream; see [`Compress`] for the tag-mapping decision).
//! Decoding dispatches strictly on the tag and fails hard on anything
//! unrecognized.
//!
//! ```
//! use frag_pack::{Codec, Format};
//!
//! # fn main() -> frag_pack::Result<()> {
//! let codec = Codec::default();
//! let transport = codec.encode("# Hello\n\nWorld.", Format::Markdown)?;
//! let decoded = codec.decode(&transport)?;
//! assert_eq!(decoded.content, "# Hello\n\nWorld.");
//! assert_eq!(decoded.metadata.format, Format::Markdown);
//! # Ok(())
//! # }
//! ```

mod codec;
mod compress;
mod container;
mod error;
mod metadata;
mod render;
mod stats;

pub use self::codec::{Codec, Decoded};
pub use self::compress::{Compress, CompressTag};
pub use self::error::{Error, Result};
pub use self::metadata::{ratio, Format, Metadata, SCHEMA_VERSION};
pub use self::render::{
    escape_html, sanitize_html, RenderMarkdown, RenderStrategy, Rendered, Renderer,
};
pub use self::stats::{human_size, stats, ReadableStats, Stats};

/// The maximum allowed size of a decoded container. URL fragments are far
/// smaller than this in practice; the bound exists so a hostile transport
/// string can't demand an arbitrarily large allocation.
pub const MAX_CONTAINER_SIZE: usize = 1 << 24; // 16 MiB

/// The maximum allowed size of the decompressed content, enforced while
/// inflating so a small container can't expand without bound.
pub const MAX_CONTENT_SIZE: usize = 1 << 24; // 16 MiB
