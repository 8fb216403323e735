/*
 * address_parser.rs
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

//! Strict RFC 5322 mailbox-list parsing (From, To, Cc, Bcc).
//!
//! Every mailbox must use the angle form `[display-name] <local@domain>`;
//! the display name may be a quoted string or a run of plain words. Bare
//! addr-specs and group syntax do not parse. None is the invalid flag, not
//! an error: callers fall back to tolerant string handling on None.

use super::address::EmailAddress;

/// Parse a comma-separated mailbox list. None when the value, or any
/// mailbox in it, does not match the strict grammar, or when the list is
/// empty.
pub fn parse_mailbox_list(value: &str) -> Option<Vec<EmailAddress>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    let mut pos = 0;
    let bytes = value.as_bytes();
    let len = bytes.len();

    while pos < len {
        skip_ws(bytes, len, &mut pos);
        if pos >= len {
            break;
        }
        let mailbox = parse_mailbox(bytes, len, &mut pos)?;
        out.push(mailbox);
        skip_ws(bytes, len, &mut pos);
        if pos < len {
            if bytes[pos] != b',' {
                return None;
            }
            pos += 1;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Parse a recipient address list (To, Cc, Bcc). Group syntax is outside
/// the strict grammar, so lists using it fall back like any other failure.
pub fn parse_address_list(value: &str) -> Option<Vec<EmailAddress>> {
    parse_mailbox_list(value)
}

fn skip_ws(bytes: &[u8], len: usize, pos: &mut usize) {
    while *pos < len
        && (bytes[*pos] == b' '
            || bytes[*pos] == b'\t'
            || bytes[*pos] == b'\r'
            || bytes[*pos] == b'\n')
    {
        *pos += 1;
    }
}

fn parse_mailbox(bytes: &[u8], len: usize, pos: &mut usize) -> Option<EmailAddress> {
    let mut display_name: Option<String> = None;
    if bytes[*pos] == b'"' {
        *pos += 1;
        let start = *pos;
        let mut closed = false;
        while *pos < len {
            if bytes[*pos] == b'\\' && *pos + 1 < len {
                *pos += 2;
                continue;
            }
            if bytes[*pos] == b'"' {
                display_name = Some(unescape(&bytes[start..*pos]));
                *pos += 1;
                closed = true;
                break;
            }
            *pos += 1;
        }
        if !closed {
            return None;
        }
        skip_ws(bytes, len, pos);
    } else if bytes[*pos] != b'<' {
        let start = *pos;
        while *pos < len && bytes[*pos] != b'<' && bytes[*pos] != b',' {
            *pos += 1;
        }
        if *pos >= len || bytes[*pos] != b'<' {
            return None;
        }
        let name = std::str::from_utf8(&bytes[start..*pos]).ok()?.trim();
        if !name.is_empty() {
            display_name = Some(name.to_string());
        }
    }
    if *pos >= len || bytes[*pos] != b'<' {
        return None;
    }
    *pos += 1;
    let start = *pos;
    while *pos < len && bytes[*pos] != b'>' {
        *pos += 1;
    }
    if *pos >= len {
        return None;
    }
    let inner = std::str::from_utf8(&bytes[start..*pos]).ok()?;
    *pos += 1;
    let at = inner.find('@')?;
    if at == 0 || at >= inner.len() - 1 {
        return None;
    }
    let local = inner[..at].trim();
    let domain = inner[at + 1..].trim();
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(EmailAddress::new(display_name, local, domain))
}

/// Resolve backslash pairs inside a quoted string.
fn unescape(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            out.push(bytes[i + 1]);
            i += 2;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_named_mailbox() {
        let list = parse_mailbox_list("Julien Vermillard <jvermillar@sensor.net>").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].display_name(), Some("Julien Vermillard"));
        assert_eq!(list[0].address(), "jvermillar@sensor.net");
    }

    #[test]
    fn quoted_display_name_keeps_comma() {
        let list = parse_mailbox_list("\"Vermillard, Julien\" <jvermillar@sensor.net>").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].display_name(), Some("Vermillard, Julien"));
    }

    #[test]
    fn quoted_display_name_unescapes() {
        let list = parse_mailbox_list("\"say \\\"ciao\\\"\" <a@b.it>").unwrap();
        assert_eq!(list[0].display_name(), Some("say \"ciao\""));
    }

    #[test]
    fn bare_angle_mailbox() {
        let list = parse_mailbox_list("<posta@example.org>").unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].display_name().is_none());
        assert_eq!(list[0].address(), "posta@example.org");
    }

    #[test]
    fn two_mailboxes() {
        let list =
            parse_mailbox_list("Anna <anna@example.com>, Bruno <bruno@example.com>").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].address(), "anna@example.com");
        assert_eq!(list[1].address(), "bruno@example.com");
    }

    #[test]
    fn trailing_comma_tolerated() {
        let list = parse_mailbox_list("Anna <anna@example.com>,").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn bare_addr_spec_is_invalid() {
        assert!(parse_mailbox_list("anna@example.com").is_none());
        assert!(parse_mailbox_list("anna@example.com, Bruno <bruno@example.com>").is_none());
    }

    #[test]
    fn group_syntax_is_invalid() {
        assert!(parse_address_list("undisclosed-recipients:;").is_none());
    }

    #[test]
    fn domainless_angle_addr_is_invalid() {
        assert!(parse_mailbox_list("Solitario <bad@>").is_none());
        assert!(parse_mailbox_list("<@nodomain>").is_none());
        assert!(parse_mailbox_list("<nulocal>").is_none());
    }

    #[test]
    fn unterminated_forms_are_invalid() {
        assert!(parse_mailbox_list("Anna <anna@example.com").is_none());
        assert!(parse_mailbox_list("\"Anna <anna@example.com>").is_none());
    }

    #[test]
    fn trailing_garbage_is_invalid() {
        assert!(parse_mailbox_list("Anna <anna@example.com> extra").is_none());
    }

    #[test]
    fn empty_value_is_invalid() {
        assert!(parse_mailbox_list("").is_none());
        assert!(parse_mailbox_list("   ").is_none());
    }
}
