/*
 * handler.rs
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

//! Structural message events, pushed from a tokenizer into a handler.

use std::io::Read;

use thiserror::Error;

use crate::error::DecomposeError;

/// One header field as it appeared on the wire, unfolded.
#[derive(Debug, Clone)]
pub struct RawField {
    name: String,
    raw: String,
}

impl RawField {
    /// `name` is the field name; `raw` is the complete unfolded line,
    /// including the name and colon.
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The complete raw line, name and colon included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Field body: the text after the first colon, leading blanks removed.
    pub fn body(&self) -> &str {
        match self.raw.split_once(':') {
            Some((_, rest)) => rest.trim_start_matches([' ', '\t']),
            None => "",
        }
    }
}

/// Declared content type of a part's payload, as reported by the tokenizer.
#[derive(Debug, Clone)]
pub struct PartDescriptor {
    mime_type: String,
    charset: Option<String>,
}

impl PartDescriptor {
    pub fn new(mime_type: impl Into<String>, charset: Option<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            charset,
        }
    }

    /// Declared media type, e.g. `text/plain`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Declared character set, when one was given.
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }
}

/// Error raised through the tokenizer/handler boundary.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The tokenizer found the message structurally malformed.
    #[error("malformed message structure: {0}")]
    Malformed(String),
    /// A handler callback failed; the cause rides along intact so callers
    /// above the tokenizer can recover it.
    #[error(transparent)]
    Handler(Box<DecomposeError>),
}

impl StructureError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

impl From<DecomposeError> for StructureError {
    fn from(cause: DecomposeError) -> Self {
        Self::Handler(Box::new(cause))
    }
}

/// Receives structural message events from a tokenizer.
///
/// Events arrive in document order, every start matched by its end. All
/// methods default to a no-op so implementations override only the events
/// they consume. Streams handed to [`body`](Self::body),
/// [`preamble`](Self::preamble), [`epilogue`](Self::epilogue) and
/// [`raw`](Self::raw) are valid only for the duration of the call.
pub trait StructureHandler {
    /// A message, or an embedded message, begins.
    fn start_message(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// The header section of the current entity begins.
    fn start_header(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// One unfolded header field of the current entity.
    fn header_field(&mut self, _field: &RawField) -> Result<(), StructureError> {
        Ok(())
    }

    /// The header section of the current entity ends.
    fn end_header(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// A multipart container begins; everything until the matching end is
    /// nested one level deeper.
    fn start_multipart(&mut self, _descriptor: &PartDescriptor) -> Result<(), StructureError> {
        Ok(())
    }

    /// The current multipart container ends.
    fn end_multipart(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// One body part of the current multipart begins.
    fn start_body_part(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// The current body part ends.
    fn end_body_part(&mut self) -> Result<(), StructureError> {
        Ok(())
    }

    /// Decoded payload of the current entity.
    fn body(
        &mut self,
        _descriptor: &PartDescriptor,
        _input: &mut dyn Read,
    ) -> Result<(), StructureError> {
        Ok(())
    }

    /// Free text before the first boundary of a multipart.
    fn preamble(&mut self, _input: &mut dyn Read) -> Result<(), StructureError> {
        Ok(())
    }

    /// Free text after the last boundary of a multipart.
    fn epilogue(&mut self, _input: &mut dyn Read) -> Result<(), StructureError> {
        Ok(())
    }

    /// Undecoded entity bytes, for tokenizers running without body decoding.
    fn raw(&mut self, _input: &mut dyn Read) -> Result<(), StructureError> {
        Ok(())
    }

    /// The message ends.
    fn end_message(&mut self) -> Result<(), StructureError> {
        Ok(())
    }
}
