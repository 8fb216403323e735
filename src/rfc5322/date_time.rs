/*
 * date_time.rs
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

//! RFC 5322 date-time parsing (section 3.3, with obsolete forms).

use chrono::{DateTime, FixedOffset};

/// Parse an RFC 5322 date-time value (e.g. "Fri, 21 Nov 1997 09:55:06 -0600").
/// None on failure; callers treat None as the invalid flag.
pub fn parse_date_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .or_else(|| parse_obsolete(value))
}

const ZONES: &[(&str, &str)] = &[
    ("UT", "+0000"),
    ("GMT", "+0000"),
    ("UTC", "+0000"),
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
];

const MONTHS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Salvage values the strict parser rejects: day names that do not match the
/// date, named zones in any position, 2-digit years, missing seconds.
fn parse_obsolete(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = match value.split_once(',') {
        Some((day, rest)) if day.len() <= 10 && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest
        }
        _ => value,
    };
    let mut tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    for token in tokens.iter_mut() {
        if let Some((_, offset)) = ZONES.iter().find(|(name, _)| token.eq_ignore_ascii_case(name))
        {
            *token = (*offset).to_string();
        }
    }
    for i in 0..tokens.len() {
        if MONTHS.iter().any(|m| tokens[i].eq_ignore_ascii_case(m)) {
            if i + 1 < tokens.len() && tokens[i + 1].len() == 2 {
                if let Ok(yy) = tokens[i + 1].parse::<u32>() {
                    // RFC 5322 4.5: 00-49 are 2000s, 50-99 are 1900s.
                    let full = if yy <= 49 { 2000 + yy } else { 1900 + yy };
                    tokens[i + 1] = full.to_string();
                }
            }
            break;
        }
    }
    let normalized = tokens.join(" ");
    DateTime::parse_from_str(&normalized, "%d %b %Y %H:%M:%S %z")
        .ok()
        .or_else(|| DateTime::parse_from_str(&normalized, "%d %b %Y %H:%M %z").ok())
}
