use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{Error, Result};

/// Size accounting for an encoded transport string, independent of which
/// codec produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    /// UTF-8 byte length of the original text, recomputed from the text
    /// itself rather than read from the container's metadata.
    pub original_size: usize,
    /// Byte length of the whole decoded container, including the 4-byte
    /// length prefix and the metadata JSON. Deliberately not the inner
    /// payload size: the ratio reflects total transport overhead.
    pub compressed_size: usize,
    /// Rounded percentage saved. Negative when the container is larger than
    /// the original, which is expected for small or incompressible inputs.
    pub ratio: i32,
    /// Human-friendly renderings of the sizes above.
    pub readable: ReadableStats,
}

/// Human-readable size strings, base-1024 units with two-decimal rounding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadableStats {
    pub original: String,
    pub compressed: String,
    pub saved: String,
}

/// Compute size statistics for a text and its encoded transport string.
///
/// Fails only if the transport string is not valid base64; the container
/// contents are not otherwise inspected.
pub fn stats(original_text: &str, transport: &str) -> Result<Stats> {
    let container = BASE64
        .decode(transport)
        .map_err(|e| Error::Decode(e.to_string()))?;
    let original_size = original_text.len();
    let compressed_size = container.len();
    let ratio = if original_size == 0 {
        0
    } else {
        ((1.0 - compressed_size as f64 / original_size as f64) * 100.0).round() as i32
    };
    let saved = original_size.saturating_sub(compressed_size);
    Ok(Stats {
        original_size,
        compressed_size,
        ratio,
        readable: ReadableStats {
            original: human_size(original_size as u64),
            compressed: human_size(compressed_size as u64),
            saved: human_size(saved as u64),
        },
    })
}

/// Render a byte count using a base-1024 scale (Bytes, KB, MB, GB), rounded
/// to at most two decimal places. Zero renders as `0 Bytes`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let value = (value * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[exp])
}
