/*
 * lib.rs
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

//! Event-driven decomposition of Internet messages.
//!
//! A grammar-level [`MessageTokenizer`] pushes structural events into the
//! [`MessageDecomposer`] engine, which extracts envelope fields from the
//! top-level headers into a [`Metadata`] record, brackets each body part in
//! an output document written through a [`DocumentSink`], and hands every
//! part payload to a pluggable [`ContentDecoder`]. Attached messages
//! re-enter the same machinery through [`Rfc822Decoder`], so arbitrarily
//! nested mail flattens into one metadata record and one document.

pub mod decoder;
pub mod error;
pub mod handler;
pub mod mail;
pub mod metadata;
pub mod rfc5322;
pub mod sink;
pub mod tokenizer;
pub mod xhtml;

pub use decoder::{AutoDecoder, ContentDecoder, DecodeError, TextDecoder};
pub use error::DecomposeError;
pub use handler::{PartDescriptor, RawField, StructureError, StructureHandler};
pub use mail::{
    decompose, decompose_with_config, MessageDecomposer, Rfc822Decoder, MESSAGE_RFC822,
};
pub use metadata::Metadata;
pub use sink::{DocumentSink, EmbeddedSink, SinkError};
pub use tokenizer::{MessageTokenizer, TokenizerConfig};
pub use xhtml::XhtmlWriter;
