/*
 * fields.rs
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

//! Envelope field extraction. Strict structured parsing first; when that
//! fails, tolerant string surgery on the raw line, so something usable is
//! recorded for every recognized field.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, warn};

use crate::handler::RawField;
use crate::metadata::{keys, Metadata};
use crate::rfc5322::{
    decode_encoded_words, parse_address_list, parse_date_time, parse_mailbox_list,
};

/// How the values of an address field were obtained.
enum Extraction {
    /// Strict grammar, one display string per mailbox.
    Structured(Vec<String>),
    /// Raw-line surgery, one trimmed segment per comma.
    Fallback(Vec<String>),
}

/// Map one header field to normalized metadata entries. Fields outside the
/// recognized envelope set produce nothing.
pub fn extract_field(field: &RawField, metadata: &mut Metadata) {
    match field.name().to_ascii_lowercase().as_str() {
        "from" => extract_from(field, metadata),
        "subject" => metadata.add(keys::SUBJECT, decode_encoded_words(field.body())),
        "to" => {
            let values = match address_values(field, "To:") {
                Extraction::Structured(values) | Extraction::Fallback(values) => values,
            };
            for value in values {
                metadata.add(keys::MESSAGE_TO, value);
            }
        }
        "cc" => {
            let values = match address_values(field, "Cc:") {
                Extraction::Structured(values) | Extraction::Fallback(values) => values,
            };
            for value in values {
                metadata.add(keys::MESSAGE_CC, value);
            }
        }
        "bcc" => match address_values(field, "Bcc:") {
            Extraction::Structured(values) => {
                for value in values {
                    metadata.add(keys::MESSAGE_BCC, value);
                }
            }
            // TODO: confirm whether fallback Bcc values should move to message-bcc.
            Extraction::Fallback(values) => {
                for value in values {
                    metadata.add(keys::MESSAGE_CC, value);
                }
            }
        },
        "date" => match parse_date_time(field.body()) {
            Some(date) => {
                metadata.set(keys::CREATION_DATE, format_date(&date));
            }
            None => warn!(value = field.body(), "unparseable Date field, dropped"),
        },
        _ => {}
    }
}

fn extract_from(field: &RawField, metadata: &mut Metadata) {
    match parse_mailbox_list(field.body()) {
        Some(mailboxes) if !mailboxes.is_empty() => {
            for mailbox in &mailboxes {
                let display = mailbox.to_string();
                metadata.add(keys::MESSAGE_FROM, display.clone());
                metadata.add(keys::AUTHOR, display);
            }
        }
        _ => {
            debug!(name = field.name(), "strict parse failed, raw fallback");
            let stripped = strip_field_prefix(field.raw(), "From:");
            let stripped = stripped.strip_prefix('<').unwrap_or(stripped);
            let stripped = stripped.strip_suffix('>').unwrap_or(stripped);
            metadata.add(keys::MESSAGE_FROM, stripped);
            metadata.add(keys::AUTHOR, stripped);
        }
    }
}

fn address_values(field: &RawField, prefix: &str) -> Extraction {
    match parse_address_list(field.body()) {
        Some(addresses) if !addresses.is_empty() => {
            Extraction::Structured(addresses.iter().map(ToString::to_string).collect())
        }
        _ => {
            debug!(name = field.name(), "strict parse failed, raw fallback");
            let list = strip_field_prefix(field.raw(), prefix);
            Extraction::Fallback(
                split_list(list)
                    .into_iter()
                    .map(|segment| segment.trim().to_string())
                    .collect(),
            )
        }
    }
}

/// Drop exactly `prefix.len()` bytes from the start of the raw line, then
/// leading spaces. Works on the raw line, so a field written with unusual
/// capitalization loses the same number of characters.
fn strip_field_prefix<'a>(raw: &'a str, prefix: &str) -> &'a str {
    let rest = raw.get(prefix.len()..).unwrap_or("");
    rest.trim_start_matches(' ')
}

/// Comma split keeping interior empties but not trailing ones. The empty
/// string yields itself as its single segment.
fn split_list(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return vec![""];
    }
    let mut segments: Vec<&str> = value.split(',').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}
