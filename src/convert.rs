//! Markdown document conversion: encoded payload -> Markdown -> HTML -> plain text.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pulldown_cmark::{html, Options, Parser};
use tracing::warn;

use crate::{
    error::{Result, ScrapeError},
    types::{ContentEncoding, FileContent},
};

/// Default column at which plain text output is wrapped
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Narrowest wrap width the text renderer can lay out
pub const MIN_WRAP_WIDTH: usize = 20;

/// Converts encoded Markdown documents into plain text
#[derive(Debug, Clone)]
pub struct Converter {
    wrap_width: usize,
}

impl Converter {
    pub fn new(wrap_width: usize) -> Self {
        Self {
            wrap_width: wrap_width.max(MIN_WRAP_WIDTH),
        }
    }

    /// Convert a document, degrading to an empty string on any failure
    ///
    /// The failure is logged with the document path.
    pub fn convert(&self, file: &FileContent) -> String {
        match self.try_convert(file) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %file.path, error = %e, "failed to convert document");
                String::new()
            }
        }
    }

    /// Convert a document, reporting decode failures
    pub fn try_convert(&self, file: &FileContent) -> Result<String> {
        let markdown = decode(file)?;
        let html = markdown_to_html(&markdown);

        Ok(html2text::from_read(html.as_bytes(), self.wrap_width))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH)
    }
}

/// Decode a payload per its declared encoding into UTF-8 text
pub fn decode(file: &FileContent) -> Result<String> {
    let decode_error = |message: String| ScrapeError::Decode {
        path: file.path.clone(),
        message,
    };

    let raw = match &file.encoding {
        ContentEncoding::Base64 => {
            // The contents API wraps base64 payloads every 60 characters
            let compact: Vec<u8> = file
                .content
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            STANDARD
                .decode(compact)
                .map_err(|e| decode_error(e.to_string()))?
        }
        // Files too large to inline come back as `none` with no content
        ContentEncoding::None if file.content.is_empty() => {
            return Err(decode_error(
                "content not inlined by the remote (file too large)".to_string(),
            ))
        }
        ContentEncoding::None => file.content.to_vec(),
        ContentEncoding::Other(name) => {
            return Err(decode_error(format!("unsupported encoding '{}'", name)))
        }
    };

    String::from_utf8(raw).map_err(|e| decode_error(e.to_string()))
}

/// Render Markdown text to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
