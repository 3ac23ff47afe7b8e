//! Content type sniffing for uploaded parts.

use axum::body::Bytes;
use futures::{Stream, StreamExt};

use crate::Result;

/// Number of leading bytes inspected when sniffing a content type.
pub const SNIFF_LEN: usize = 512;

/// Detect a MIME type from the leading bytes of some content.
///
/// Only the first [`SNIFF_LEN`] bytes are considered. Known binary formats
/// are recognised by their magic numbers; anything else that is valid UTF-8
/// without binary control bytes is `text/plain`, and the rest is
/// `application/octet-stream`.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(data) {
        return kind.mime_type();
    }

    if looks_like_text(data) {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    let valid_utf8 = match std::str::from_utf8(data) {
        Ok(_) => true,
        // The prefix may cut a multi-byte character in half.
        Err(e) => e.error_len().is_none(),
    };

    valid_utf8
        && !data
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
}

/// A part stream whose first bytes have been read for sniffing.
///
/// The sniffed prefix is kept in memory and handed out again as the first
/// chunk, so consumers see the complete content without the underlying
/// stream ever being rewound.
pub struct SniffedPart<S> {
    stream: S,
    prefix: Option<Bytes>,
    content_type: &'static str,
}

impl<S> SniffedPart<S>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    /// Read up to [`SNIFF_LEN`] bytes from `stream` and sniff them.
    pub async fn new(mut stream: S) -> Result<Self> {
        let mut buf = Vec::with_capacity(SNIFF_LEN);

        while buf.len() < SNIFF_LEN {
            match stream.next().await {
                Some(chunk) => buf.extend_from_slice(&chunk?),
                None => break,
            }
        }

        let content_type = detect_content_type(&buf);
        let prefix = (!buf.is_empty()).then(|| Bytes::from(buf));

        Ok(Self {
            stream,
            prefix,
            content_type,
        })
    }

    /// The sniffed MIME type.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Next chunk of content, starting with the buffered prefix.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if let Some(prefix) = self.prefix.take() {
            return Ok(Some(prefix));
        }
        self.stream.next().await.transpose()
    }
}
