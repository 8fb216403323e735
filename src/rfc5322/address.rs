/*
 * address.rs
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

//! RFC 5322 email address (mailbox).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub display_name: Option<String>,
    pub local_part: String,
    pub domain: String,
}

impl EmailAddress {
    pub fn new(
        display_name: Option<impl Into<String>>,
        local_part: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.map(|s| s.into()),
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Bare mailbox address: local-part@domain.
    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// The display form `Name <local@domain>`, or `<local@domain>` when no
/// display name is present. This is the exact string recorded in metadata
/// for address fields that parse.
impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref dn) = self.display_name {
            if !dn.is_empty() {
                write!(f, "{} ", dn)?;
            }
        }
        write!(f, "<{}>", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_name() {
        let addr = EmailAddress::new(Some("Julien Vermillard"), "jvermillar", "sensor.net");
        assert_eq!(addr.to_string(), "Julien Vermillard <jvermillar@sensor.net>");
    }

    #[test]
    fn display_without_name() {
        let addr = EmailAddress::new(None::<String>, "posta", "example.org");
        assert_eq!(addr.to_string(), "<posta@example.org>");
    }

    #[test]
    fn empty_name_falls_back_to_bare_form() {
        let addr = EmailAddress::new(Some(""), "posta", "example.org");
        assert_eq!(addr.to_string(), "<posta@example.org>");
    }
}
