/*
 * encoded_word.rs
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

//! RFC 2047 encoded-word decoding (e.g. =?charset?q?text?=).

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;

/// Expand RFC 2047 encoded-words in an unstructured header value.
///
/// Literal text passes through unchanged, undecodable words stay as
/// written, and whitespace between two adjacent encoded-words is dropped
/// (RFC 2047 section 6.2).
pub fn decode_encoded_words(value: &str) -> String {
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut out = String::new();
    let mut pos = 0;
    let mut after_word = false;

    while pos < len {
        let Some(start) = find_word_start(bytes, pos) else {
            out.push_str(std::str::from_utf8(&bytes[pos..]).unwrap_or(""));
            break;
        };
        let mut cursor = start;
        match decode_word(bytes, len, &mut cursor) {
            Some(decoded) => {
                let gap = &bytes[pos..start];
                if !(after_word && gap.iter().all(|b| b.is_ascii_whitespace())) {
                    out.push_str(std::str::from_utf8(gap).unwrap_or(""));
                }
                out.push_str(&decoded);
                pos = cursor;
                after_word = true;
            }
            None => {
                let skip = (start + 2).min(len);
                out.push_str(std::str::from_utf8(&bytes[pos..skip]).unwrap_or(""));
                pos = skip;
                after_word = false;
            }
        }
    }
    out
}

fn find_word_start(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|w| w == b"=?")
        .map(|i| from + i)
}

/// Decode one encoded-word at `pos`. On success `pos` lands after the
/// closing `?=`; on failure `pos` is unspecified and the caller rescans.
fn decode_word(bytes: &[u8], len: usize, pos: &mut usize) -> Option<String> {
    if *pos + 4 > len || &bytes[*pos..*pos + 2] != b"=?" {
        return None;
    }
    *pos += 2;
    let charset_start = *pos;
    let q1 = bytes[*pos..].iter().position(|&b| b == b'?')? + *pos;
    if q1 == charset_start || q1 + 2 >= len {
        return None;
    }
    let charset = std::str::from_utf8(&bytes[charset_start..q1]).ok()?.trim();
    // RFC 2231 language suffix, e.g. UTF-8*en
    let charset = charset.split('*').next().unwrap_or(charset);
    let encoding = bytes[q1 + 1].to_ascii_lowercase();
    if bytes[q1 + 2] != b'?' {
        return None;
    }
    let payload_start = q1 + 3;
    let end = bytes[payload_start..]
        .windows(2)
        .position(|w| w == b"?=")?
        + payload_start;
    *pos = end + 2;
    let payload = &bytes[payload_start..end];
    let decoded = match encoding {
        b'b' => decode_b(payload)?,
        b'q' => decode_q(payload),
        _ => return None,
    };
    Some(decode_charset(&decoded, charset))
}

fn decode_b(payload: &[u8]) -> Option<Vec<u8>> {
    let cleaned: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(&cleaned)
        .ok()
        .or_else(|| STANDARD_NO_PAD.decode(&cleaned).ok())
}

/// Q encoding: `_` is space, `=XX` is a hex byte, bad escapes pass through.
fn decode_q(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len());
    let mut i = 0;
    while i < payload.len() {
        match payload[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' if i + 2 < payload.len() => {
                match (hex_val(payload[i + 1]), hex_val(payload[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'=');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

fn decode_charset(bytes: &[u8], label: &str) -> String {
    match encoding_rs::Encoding::for_label(label.as_bytes()) {
        Some(encoding) => encoding.decode(bytes).0.into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}
