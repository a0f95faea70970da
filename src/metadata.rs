use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::compress::CompressTag;

/// Schema version written into every metadata record.
pub const SCHEMA_VERSION: u8 = 1;

/// The metadata record attached to every encoded container.
///
/// This is the wire-exact JSON shape: short key names are the interchange
/// format and must remain stable for records tagged `v: 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema version (`v`), currently always [`SCHEMA_VERSION`].
    #[serde(rename = "v")]
    pub version: u8,
    /// Codec tag (`c`) identifying how the payload segment is compressed.
    #[serde(rename = "c")]
    pub codec: CompressTag,
    /// Format tag (`f`) identifying how the decoded text should render.
    #[serde(rename = "f")]
    pub format: Format,
    /// Original payload size (`os`) in UTF-8 bytes. Informational only;
    /// never used to validate the payload.
    #[serde(rename = "os")]
    pub original_size: u64,
    /// Stored payload size (`cs`) in bytes. Must equal the length of the
    /// payload segment that follows the metadata segment.
    #[serde(rename = "cs")]
    pub stored_size: u64,
    /// Percentage size reduction (`r`), rounded. Absent for uncompressed
    /// payloads and for zero-length originals.
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<i32>,
    /// Creation time (`ts`) in milliseconds since the Unix epoch.
    #[serde(rename = "ts")]
    pub timestamp_ms: i64,
}

/// Rounded percentage size reduction, `round((1 - stored/original) * 100)`.
///
/// Returns `None` for a zero-length original rather than dividing by zero.
/// Negative values are valid: small or incompressible inputs can grow.
pub fn ratio(original: u64, stored: u64) -> Option<i32> {
    if original == 0 {
        return None;
    }
    Some(((1.0 - stored as f64 / original as f64) * 100.0).round() as i32)
}

/// Milliseconds since the Unix epoch, for the metadata `ts` field.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Content format carried in the metadata record's `f` field.
///
/// Parsing is permissive: unrecognized values are stored verbatim in
/// [`Format::Other`] and render as plain text. The tag only describes how
/// decoded text should be displayed; it is independent of compression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Html,
    Markdown,
    Json,
    Text,
    /// Unrecognized format value, kept verbatim.
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::Json => "json",
            Format::Text => "text",
            Format::Other(s) => s,
        }
    }
}

impl From<&str> for Format {
    fn from(s: &str) -> Self {
        match s {
            "html" => Format::Html,
            "markdown" => Format::Markdown,
            "json" => Format::Json,
            "text" => Format::Text,
            other => Format::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.as_str().into())
    }
}
