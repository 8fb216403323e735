/*
 * metadata.rs
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

//! Multi-valued metadata record with stable insertion order.

use indexmap::IndexMap;

/// Names of the metadata entries produced by envelope extraction and part
/// decoding. Lookups are exact; use these constants rather than literals.
pub mod keys {
    /// Display string of each From mailbox, or the fallback From value.
    pub const MESSAGE_FROM: &str = "message-from";
    /// Duplicate of [`MESSAGE_FROM`] under the generic authorship name.
    pub const AUTHOR: &str = "author";
    /// Decoded Subject text.
    pub const SUBJECT: &str = "subject";
    /// One entry per To recipient.
    pub const MESSAGE_TO: &str = "message-to";
    /// One entry per Cc recipient.
    pub const MESSAGE_CC: &str = "message-cc";
    /// One entry per Bcc recipient.
    pub const MESSAGE_BCC: &str = "message-bcc";
    /// Message date, normalized to UTC ISO 8601.
    pub const CREATION_DATE: &str = "creation-date";
    /// Declared media type of a decoded part.
    pub const CONTENT_TYPE: &str = "content-type";
    /// Declared character set of a decoded part.
    pub const CONTENT_ENCODING: &str = "content-encoding";
}

/// An ordered mapping from entry names to one or more string values.
///
/// Names keep the order of first insertion, and values under one name keep
/// the order they were added in, so two runs over the same input produce
/// the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    entries: IndexMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`, preserving existing values.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Replace all values under `name` with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_string(), vec![value.into()]);
    }

    /// First value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values under `name`, in insertion order.
    pub fn values(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entry names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every (name, value) pair, flattened, in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Number of distinct entry names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
