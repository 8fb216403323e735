/*
 * mod.rs
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

//! Mail decomposition entry points: wiring between a message tokenizer,
//! the engine, and the content decoder, plus the decoder that lets
//! attached messages re-enter the same machinery.

mod decomposer;
mod fields;

pub use decomposer::MessageDecomposer;
pub use fields::extract_field;

use std::io::Read;
use std::sync::Arc;

use tracing::debug;

use crate::decoder::{AutoDecoder, ContentDecoder, DecodeError};
use crate::error::DecomposeError;
use crate::handler::StructureError;
use crate::metadata::Metadata;
use crate::sink::DocumentSink;
use crate::tokenizer::{MessageTokenizer, TokenizerConfig};

/// Media type served by [`Rfc822Decoder`].
pub const MESSAGE_RFC822: &str = "message/rfc822";

/// Decompose one message with the default tokenizer configuration.
pub fn decompose(
    tokenizer: &dyn MessageTokenizer,
    input: &mut dyn Read,
    sink: &mut dyn DocumentSink,
    metadata: &mut Metadata,
    decoder: &dyn ContentDecoder,
) -> Result<(), DecomposeError> {
    decompose_with_config(
        tokenizer,
        input,
        &TokenizerConfig::default(),
        sink,
        metadata,
        decoder,
    )
}

/// Decompose one message: tokenize `input`, extract envelope fields into
/// `metadata`, and write the body document into `sink`, decoding each part
/// payload through `decoder`.
///
/// The first failure ends the run; output already written stays written.
/// Failures that began inside the engine's callbacks come back as their
/// original kind, not wrapped as tokenizer failures.
pub fn decompose_with_config(
    tokenizer: &dyn MessageTokenizer,
    input: &mut dyn Read,
    config: &TokenizerConfig,
    sink: &mut dyn DocumentSink,
    metadata: &mut Metadata,
    decoder: &dyn ContentDecoder,
) -> Result<(), DecomposeError> {
    let mut engine = MessageDecomposer::new(sink, metadata, decoder);
    match tokenizer.tokenize(input, config, &mut engine) {
        Ok(()) => Ok(()),
        Err(StructureError::Handler(cause)) => Err(*cause),
        Err(StructureError::Malformed(message)) => Err(DecomposeError::Structure(message)),
    }
}

/// Content decoder for `message/rfc822` payloads.
///
/// An attached message is a complete message, so it goes back through the
/// front door: the held tokenizer re-tokenizes the payload and a fresh
/// engine decomposes it, writing into the same output document at the
/// current position. Each decode builds a fresh part registry that includes
/// this decoder again, so messages nest to any depth.
///
/// Failures from the inner run keep their kind: sink and decode errors
/// surface as themselves, structural failures as [`DecodeError::Message`].
pub struct Rfc822Decoder {
    tokenizer: Arc<dyn MessageTokenizer>,
    config: TokenizerConfig,
}

impl Rfc822Decoder {
    pub fn new(tokenizer: Arc<dyn MessageTokenizer>) -> Self {
        Self::with_config(tokenizer, TokenizerConfig::default())
    }

    pub fn with_config(tokenizer: Arc<dyn MessageTokenizer>, config: TokenizerConfig) -> Self {
        Self { tokenizer, config }
    }

    /// The bundled registry extended with this decoder under
    /// [`MESSAGE_RFC822`].
    pub fn standard_registry(tokenizer: Arc<dyn MessageTokenizer>) -> AutoDecoder {
        let mut registry = AutoDecoder::standard();
        registry.register(MESSAGE_RFC822, Box::new(Rfc822Decoder::new(tokenizer)));
        registry
    }
}

impl ContentDecoder for Rfc822Decoder {
    fn decode(
        &self,
        input: &mut dyn Read,
        sink: &mut dyn DocumentSink,
        metadata: &mut Metadata,
    ) -> Result<(), DecodeError> {
        debug!("decomposing attached message");
        let mut registry = AutoDecoder::standard();
        registry.register(
            MESSAGE_RFC822,
            Box::new(Rfc822Decoder {
                tokenizer: self.tokenizer.clone(),
                config: self.config.clone(),
            }),
        );
        match decompose_with_config(
            self.tokenizer.as_ref(),
            input,
            &self.config,
            sink,
            metadata,
            &registry,
        ) {
            Ok(()) => Ok(()),
            // sink and decode failures keep their kind at every nesting level
            Err(DecomposeError::Sink(err)) => Err(DecodeError::Sink(err)),
            Err(DecomposeError::Decode(err)) => Err(err),
            Err(err) => Err(DecodeError::Message(Box::new(err))),
        }
    }
}
