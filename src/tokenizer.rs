/*
 * tokenizer.rs
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

//! Tokenizer contract: whatever reads raw message bytes and pushes
//! structural events.

use std::io::Read;

use crate::handler::{StructureError, StructureHandler};

/// Settings every conforming tokenizer honors.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Longest header line accepted before tokenization fails as malformed.
    pub max_header_line_len: usize,
    /// Decode transfer encodings (base64, quoted-printable) before emitting
    /// body events. When off, tokenizers emit [`StructureHandler::raw`]
    /// instead of decoded bodies.
    pub decode_bodies: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_header_line_len: 10_000,
            decode_bodies: true,
        }
    }
}

/// Grammar-level message tokenizer.
///
/// An implementation reads one complete message from `input` and pushes its
/// structure into `handler`: events in document order, every start event
/// matched by its end event, nesting reflected by
/// `start_multipart`/`end_multipart` pairs. Handler errors propagate out
/// unchanged; tokenizer-detected problems surface as
/// [`StructureError::Malformed`].
pub trait MessageTokenizer {
    fn tokenize(
        &self,
        input: &mut dyn Read,
        config: &TokenizerConfig,
        handler: &mut dyn StructureHandler,
    ) -> Result<(), StructureError>;
}
