/*
 * decomposer.rs
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

//! The decomposition engine: a structure handler that files envelope
//! metadata, brackets body parts in the output document, and hands each
//! payload to the content decoder.

use std::io::Read;

use tracing::debug;

use crate::decoder::{ContentDecoder, DecodeError};
use crate::error::DecomposeError;
use crate::handler::{PartDescriptor, RawField, StructureError, StructureHandler};
use crate::mail::fields::extract_field;
use crate::metadata::{keys, Metadata};
use crate::sink::{DocumentSink, EmbeddedSink, SinkError};

fn sink_err(err: SinkError) -> StructureError {
    StructureError::from(DecomposeError::Sink(err))
}

/// One-shot engine: construct per message, feed it a tokenizer's events.
///
/// Header fields count as envelope fields only while no multipart is open;
/// fields of nested parts and attached messages never touch the caller's
/// metadata record. Every body payload is decoded into the sink through an
/// [`EmbeddedSink`], with its own part-scoped metadata record.
pub struct MessageDecomposer<'a> {
    sink: &'a mut dyn DocumentSink,
    metadata: &'a mut Metadata,
    decoder: &'a dyn ContentDecoder,
    /// Multipart nesting depth. Zero means top-level message headers.
    depth: u32,
}

impl<'a> MessageDecomposer<'a> {
    pub fn new(
        sink: &'a mut dyn DocumentSink,
        metadata: &'a mut Metadata,
        decoder: &'a dyn ContentDecoder,
    ) -> Self {
        Self {
            sink,
            metadata,
            decoder,
            depth: 0,
        }
    }
}

impl StructureHandler for MessageDecomposer<'_> {
    fn start_message(&mut self) -> Result<(), StructureError> {
        self.sink.start_document().map_err(sink_err)
    }

    fn end_message(&mut self) -> Result<(), StructureError> {
        self.sink.end_document().map_err(sink_err)
    }

    fn header_field(&mut self, field: &RawField) -> Result<(), StructureError> {
        if self.depth == 0 {
            extract_field(field, self.metadata);
        }
        Ok(())
    }

    fn start_multipart(&mut self, descriptor: &PartDescriptor) -> Result<(), StructureError> {
        debug!(
            media_type = descriptor.mime_type(),
            depth = self.depth,
            "entering multipart"
        );
        self.depth += 1;
        Ok(())
    }

    fn end_multipart(&mut self) -> Result<(), StructureError> {
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn start_body_part(&mut self) -> Result<(), StructureError> {
        self.sink
            .start_element("div", &[("class", "email-entry")])
            .map_err(sink_err)?;
        self.sink.start_element("p", &[]).map_err(sink_err)
    }

    fn end_body_part(&mut self) -> Result<(), StructureError> {
        self.sink.end_element("p").map_err(sink_err)?;
        self.sink.end_element("div").map_err(sink_err)
    }

    fn body(
        &mut self,
        descriptor: &PartDescriptor,
        input: &mut dyn Read,
    ) -> Result<(), StructureError> {
        debug!(
            media_type = descriptor.mime_type(),
            depth = self.depth,
            "decoding body payload"
        );
        let mut part_metadata = Metadata::new();
        part_metadata.set(keys::CONTENT_TYPE, descriptor.mime_type());
        if let Some(charset) = descriptor.charset() {
            part_metadata.set(keys::CONTENT_ENCODING, charset);
        }
        let mut embedded = EmbeddedSink::new(self.sink);
        match self.decoder.decode(input, &mut embedded, &mut part_metadata) {
            Ok(()) => Ok(()),
            Err(DecodeError::Sink(err)) => Err(sink_err(err)),
            Err(err) => Err(StructureError::from(DecomposeError::Decode(err))),
        }
    }
}
