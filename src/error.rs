/*
 * error.rs
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

//! Terminal error surface of a decomposition run.

use thiserror::Error;

use crate::decoder::DecodeError;
use crate::sink::SinkError;

/// Why a decomposition run stopped.
///
/// The first failure terminates the run. Metadata entries and document
/// output produced before the failure stay where they are; nothing is
/// rolled back.
#[derive(Debug, Error)]
pub enum DecomposeError {
    /// The tokenizer found the message structurally malformed.
    #[error("malformed message structure: {0}")]
    Structure(String),
    /// A part payload could not be decoded.
    #[error("part decode failed")]
    Decode(#[source] DecodeError),
    /// The output sink rejected a structural call.
    #[error("output document rejected")]
    Sink(#[source] SinkError),
}
