use std::sync::OnceLock;

use regex::Regex;

use crate::metadata::Format;

/// How a piece of decoded content should be displayed, chosen from the
/// metadata's format tag. Anything unrecognized falls back to plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Embed the content as HTML after running the denylist sanitizer.
    SanitizedHtml,
    /// Convert Markdown to HTML via the injected capability.
    Markdown,
    /// Parse and pretty-print as JSON.
    PrettyJson,
    /// Escape and wrap as preformatted plain text.
    PlainText,
}

impl RenderStrategy {
    pub fn for_format(format: &Format) -> Self {
        match format {
            Format::Html => RenderStrategy::SanitizedHtml,
            Format::Markdown => RenderStrategy::Markdown,
            Format::Json => RenderStrategy::PrettyJson,
            Format::Text | Format::Other(_) => RenderStrategy::PlainText,
        }
    }
}

/// Capability for turning Markdown text into an HTML string.
///
/// Supplied by the embedding application at construction time; there is no
/// runtime library loading. When absent, Markdown content renders as escaped
/// plain text.
pub trait RenderMarkdown {
    fn render(&self, markdown: &str) -> String;
}

impl<F> RenderMarkdown for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Rendered output together with the strategy that produced it, so the
/// embedding page can pick matching chrome (stats panel, TOC, etc.).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub strategy: RenderStrategy,
    pub html: String,
}

/// Maps decoded content and its format tag to display-ready HTML.
#[derive(Default)]
pub struct Renderer {
    markdown: Option<Box<dyn RenderMarkdown>>,
}

impl Renderer {
    /// A renderer with no Markdown capability; Markdown content falls back
    /// to plain text.
    pub fn new() -> Self {
        Self { markdown: None }
    }

    /// A renderer with an injected Markdown-to-HTML capability.
    pub fn with_markdown(markdown: Box<dyn RenderMarkdown>) -> Self {
        Self {
            markdown: Some(markdown),
        }
    }

    /// Render decoded content according to its format tag. Infallible: every
    /// strategy has a deterministic plain-text fallback.
    pub fn render(&self, content: &str, format: &Format) -> Rendered {
        let strategy = RenderStrategy::for_format(format);
        match strategy {
            RenderStrategy::SanitizedHtml => Rendered {
                strategy,
                html: sanitize_html(content),
            },
            RenderStrategy::Markdown => match &self.markdown {
                Some(renderer) => Rendered {
                    strategy,
                    html: sanitize_html(&renderer.render(content)),
                },
                None => Rendered {
                    strategy: RenderStrategy::PlainText,
                    html: preformatted(content),
                },
            },
            RenderStrategy::PrettyJson => match serde_json::from_str::<serde_json::Value>(content)
            {
                Ok(value) => {
                    // Pretty-printing a just-parsed value can't fail.
                    let pretty = serde_json::to_string_pretty(&value)
                        .unwrap_or_else(|_| content.to_string());
                    Rendered {
                        strategy,
                        html: preformatted(&pretty),
                    }
                }
                Err(_) => Rendered {
                    strategy: RenderStrategy::PlainText,
                    html: preformatted(content),
                },
            },
            RenderStrategy::PlainText => Rendered {
                strategy,
                html: preformatted(content),
            },
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("markdown", &self.markdown.is_some())
            .finish()
    }
}

/// Strip known-dangerous constructs from HTML with a simple denylist. This
/// is not a full sanitizer: the goal is keeping embedded content from
/// running script in the host page, not policing every attribute.
pub fn sanitize_html(html: &str) -> String {
    static SCRIPT_BLOCK: OnceLock<Regex> = OnceLock::new();
    static DENIED_TAG: OnceLock<Regex> = OnceLock::new();
    static EVENT_HANDLER: OnceLock<Regex> = OnceLock::new();
    static SCRIPT_URL: OnceLock<Regex> = OnceLock::new();

    let script_block = SCRIPT_BLOCK
        .get_or_init(|| Regex::new(r"(?is)<\s*script[^>]*>.*?<\s*/\s*script\s*>").unwrap());
    let denied_tag = DENIED_TAG.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*(script|iframe|object|embed|form|link|meta|base)\b[^>]*>")
            .unwrap()
    });
    let event_handler = EVENT_HANDLER
        .get_or_init(|| Regex::new(r#"(?i)\son\w+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap());
    let script_url = SCRIPT_URL.get_or_init(|| Regex::new(r"(?i)javascript\s*:").unwrap());

    let out = script_block.replace_all(html, "");
    let out = denied_tag.replace_all(&out, "");
    let out = event_handler.replace_all(&out, "");
    script_url.replace_all(&out, "").into_owned()
}

/// Escape text for literal display inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}
