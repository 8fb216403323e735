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

//! RFC 5322 structured header grammar: mailboxes, date-times, encoded words.

mod address;
mod address_parser;
mod date_time;
mod encoded_word;

pub use address::EmailAddress;
pub use address_parser::{parse_address_list, parse_mailbox_list};
pub use date_time::parse_date_time;
pub use encoded_word::decode_encoded_words;
