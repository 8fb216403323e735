/*
 * sink.rs
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

//! Output document sink: the structural target decomposition writes into.

use thiserror::Error;

/// Failure raised by a [`DocumentSink`] implementation.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to the underlying output failed.
    #[error("document write failed")]
    Io(#[from] std::io::Error),
    /// Serializing markup failed.
    #[error("document serialization failed")]
    Xml(#[from] quick_xml::Error),
    /// `end_element` named something other than the innermost open element.
    #[error("mismatched close: expected </{expected}>, got </{got}>")]
    MismatchedClose { expected: String, got: String },
    /// A structural call arrived while no document was open.
    #[error("{0} outside an open document")]
    DocumentNotOpen(&'static str),
    /// `start_document` arrived while a document was already open.
    #[error("document already open")]
    AlreadyOpen,
    /// The document was closed with an element still open.
    #[error("document closed with <{0}> still open")]
    StillOpen(String),
}

/// Receives the output document as structural calls.
///
/// Calls arrive well nested: one `start_document`/`end_document` pair
/// brackets the run, every `start_element` is closed by an `end_element`
/// naming the same element, and closes happen innermost first.
pub trait DocumentSink {
    /// Open the document root. Called once, before any other call.
    fn start_document(&mut self) -> Result<(), SinkError>;
    /// Close the document root. Called once, after every element is closed.
    fn end_document(&mut self) -> Result<(), SinkError>;
    /// Open an element with the given attributes, in order.
    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SinkError>;
    /// Close the innermost open element; `name` must match it.
    fn end_element(&mut self, name: &str) -> Result<(), SinkError>;
    /// Character content at the current position.
    fn text(&mut self, content: &str) -> Result<(), SinkError>;
}

/// Sink adapter for embedded decodes.
///
/// Element and text calls pass straight through; document open and close are
/// swallowed, so content produced while decoding an embedded payload lands at
/// the current nesting point of the outer document instead of opening a
/// second root.
pub struct EmbeddedSink<'a> {
    inner: &'a mut dyn DocumentSink,
}

impl<'a> EmbeddedSink<'a> {
    pub fn new(inner: &'a mut dyn DocumentSink) -> Self {
        Self { inner }
    }
}

impl DocumentSink for EmbeddedSink<'_> {
    fn start_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SinkError> {
        self.inner.start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.inner.end_element(name)
    }

    fn text(&mut self, content: &str) -> Result<(), SinkError> {
        self.inner.text(content)
    }
}
