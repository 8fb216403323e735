/*
 * decoder.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Smistaposta, a mail decomposition library.
 *
 * Smistaposta is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Smistaposta is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Smistaposta.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Content decoding: capability trait, dispatching registry, text decoder.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use thiserror::Error;
use tracing::debug;

use crate::error::DecomposeError;
use crate::metadata::{keys, Metadata};
use crate::sink::{DocumentSink, SinkError};

/// Failure while decoding one content payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No registered decoder matches the declared or detected media type.
    #[error("no decoder for media type {0}")]
    Unsupported(String),
    /// Reading the payload stream failed.
    #[error("payload read failed")]
    Io(#[from] std::io::Error),
    /// The sink rejected content emitted by the decoder.
    #[error("decoded content rejected by sink")]
    Sink(#[from] SinkError),
    /// An embedded message failed to decompose.
    #[error("embedded message failed")]
    Message(#[source] Box<DecomposeError>),
}

/// Decodes one content payload into the output document.
///
/// A decoder renders the payload as element and text calls on `sink`,
/// embedded at the caller's current nesting point, and may read or enrich
/// `metadata`, a record scoped to this payload alone.
pub trait ContentDecoder {
    fn decode(
        &self,
        input: &mut dyn Read,
        sink: &mut dyn DocumentSink,
        metadata: &mut Metadata,
    ) -> Result<(), DecodeError>;
}

/// RFC 2045 token character.
#[inline]
fn is_token_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~'
    )
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

/// Normalized `type/subtype` from a content-type value: parameters stripped,
/// both halves lowercased. None when the value has no token/token shape.
pub fn normalize_media_type(value: &str) -> Option<String> {
    let type_part = value.split(';').next().unwrap_or("").trim();
    let (primary, sub) = type_part.split_once('/')?;
    let primary = primary.trim();
    let sub = sub.trim();
    if !is_token(primary) || !is_token(sub) {
        return None;
    }
    Some(format!(
        "{}/{}",
        primary.to_ascii_lowercase(),
        sub.to_ascii_lowercase()
    ))
}

/// Best-effort media type detection from leading payload bytes. Magic
/// numbers first, then a line-oriented look for a header block, then a
/// plain-text heuristic.
pub fn sniff_media_type(payload: &[u8]) -> Option<&'static str> {
    const MAGIC: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"PK\x03\x04", "application/zip"),
    ];
    for (magic, media_type) in MAGIC {
        if payload.starts_with(magic) {
            return Some(media_type);
        }
    }
    if looks_like_html(payload) {
        return Some("text/html");
    }
    if looks_like_message(payload) {
        return Some("message/rfc822");
    }
    if looks_like_text(payload) {
        return Some("text/plain");
    }
    None
}

fn looks_like_html(payload: &[u8]) -> bool {
    let head = &payload[..payload.len().min(256)];
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = &head[start..];
    let lowered: Vec<u8> = head
        .iter()
        .take(16)
        .map(u8::to_ascii_lowercase)
        .collect();
    lowered.starts_with(b"<!doctype html") || lowered.starts_with(b"<html")
}

/// A leading `Name: value` line with a known message header name.
fn looks_like_message(payload: &[u8]) -> bool {
    const HEADERS: &[&str] = &[
        "received:",
        "return-path:",
        "from:",
        "to:",
        "subject:",
        "date:",
        "mime-version:",
        "message-id:",
    ];
    let line_end = payload
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(payload.len());
    let first_line = match std::str::from_utf8(&payload[..line_end.min(200)]) {
        Ok(line) => line.to_ascii_lowercase(),
        Err(_) => return false,
    };
    HEADERS.iter().any(|h| first_line.starts_with(h))
}

/// No NUL and mostly printable ASCII or whitespace in the leading window.
fn looks_like_text(payload: &[u8]) -> bool {
    if payload.is_empty() {
        return true;
    }
    let window = &payload[..payload.len().min(512)];
    if window.contains(&0) {
        return false;
    }
    let printable = window
        .iter()
        .filter(|b| b.is_ascii_graphic() || b.is_ascii_whitespace() || **b >= 0x80)
        .count();
    printable * 100 / window.len() >= 90
}

/// Dispatching decoder registry.
///
/// Holds decoders keyed by exact `type/subtype` or by `type/*` wildcard.
/// Dispatch prefers the declared type from the payload's metadata record;
/// when that is missing or unregistered it sniffs the bytes, and when
/// nothing matches it falls back to the configured last-resort decoder, or
/// fails with [`DecodeError::Unsupported`].
#[derive(Default)]
pub struct AutoDecoder {
    exact: HashMap<String, Box<dyn ContentDecoder>>,
    primary: HashMap<String, Box<dyn ContentDecoder>>,
    fallback: Option<Box<dyn ContentDecoder>>,
}

impl AutoDecoder {
    /// Empty registry. Nothing dispatches until decoders are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled decoders: `text/*` handled by
    /// [`TextDecoder`].
    pub fn standard() -> Self {
        let mut auto = Self::new();
        auto.register("text/*", Box::new(TextDecoder));
        auto
    }

    /// Register `decoder` for `pattern`: either an exact `type/subtype` or a
    /// `type/*` wildcard. Later registrations replace earlier ones for the
    /// same pattern.
    pub fn register(&mut self, pattern: &str, decoder: Box<dyn ContentDecoder>) {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.strip_suffix("/*") {
            Some(primary) => {
                self.primary.insert(primary.to_string(), decoder);
            }
            None => {
                self.exact.insert(pattern, decoder);
            }
        }
    }

    /// Decoder used when no pattern matches, before giving up.
    pub fn set_fallback(&mut self, decoder: Box<dyn ContentDecoder>) {
        self.fallback = Some(decoder);
    }

    fn lookup(&self, media_type: &str) -> Option<&dyn ContentDecoder> {
        if let Some(decoder) = self.exact.get(media_type) {
            return Some(decoder.as_ref());
        }
        let primary = media_type.split('/').next().unwrap_or(media_type);
        self.primary.get(primary).map(|decoder| decoder.as_ref())
    }
}

impl ContentDecoder for AutoDecoder {
    fn decode(
        &self,
        input: &mut dyn Read,
        sink: &mut dyn DocumentSink,
        metadata: &mut Metadata,
    ) -> Result<(), DecodeError> {
        let mut payload = Vec::new();
        input.read_to_end(&mut payload)?;
        let declared = metadata
            .get(keys::CONTENT_TYPE)
            .and_then(normalize_media_type);
        let resolved = declared
            .clone()
            .filter(|t| self.lookup(t).is_some())
            .or_else(|| sniff_media_type(&payload).map(str::to_string));
        debug!(
            media_type = resolved.as_deref().unwrap_or("unknown"),
            bytes = payload.len(),
            "dispatching payload"
        );
        if let Some(media_type) = resolved.as_deref() {
            if declared.as_deref() != Some(media_type) {
                metadata.set(keys::CONTENT_TYPE, media_type);
            }
        }
        let decoder = resolved
            .as_deref()
            .and_then(|t| self.lookup(t))
            .or(self.fallback.as_deref());
        match decoder {
            Some(decoder) => decoder.decode(&mut Cursor::new(payload), sink, metadata),
            None => Err(DecodeError::Unsupported(
                declared
                    .or(resolved)
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            )),
        }
    }
}

/// Decoder for textual payloads. Charset-decodes the bytes per the record's
/// content-encoding entry (UTF-8 when absent or unknown) and emits the
/// result as one text call.
#[derive(Debug, Default)]
pub struct TextDecoder;

impl ContentDecoder for TextDecoder {
    fn decode(
        &self,
        input: &mut dyn Read,
        sink: &mut dyn DocumentSink,
        metadata: &mut Metadata,
    ) -> Result<(), DecodeError> {
        let mut payload = Vec::new();
        input.read_to_end(&mut payload)?;
        let encoding = metadata
            .get(keys::CONTENT_ENCODING)
            .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
            .unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(&payload);
        sink.text(&text)?;
        Ok(())
    }
}
