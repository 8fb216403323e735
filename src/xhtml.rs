/*
 * xhtml.rs
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

//! XHTML rendering of the output document. All markup goes through the
//! quick_xml writer; no hand-built tags.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::sink::{DocumentSink, SinkError};

/// XHTML namespace placed on the document root.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// [`DocumentSink`] that serializes the run as a single XHTML document.
///
/// `start_document` writes the XML declaration and opens
/// `<html>`/`<head>`/`<body>`; `end_document` closes them. The writer keeps
/// its own stack of open elements and rejects closes that do not match the
/// innermost one, so malformed call sequences fail instead of producing
/// malformed markup.
pub struct XhtmlWriter<W: Write> {
    writer: Writer<W>,
    open_elements: Vec<String>,
    document_open: bool,
}

impl<W: Write> XhtmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: Writer::new(out),
            open_elements: Vec::new(),
            document_open: false,
        }
    }

    /// Consume the writer and hand back the underlying output.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> DocumentSink for XhtmlWriter<W> {
    fn start_document(&mut self) -> Result<(), SinkError> {
        if self.document_open {
            return Err(SinkError::AlreadyOpen);
        }
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut html = BytesStart::new("html");
        html.push_attribute(("xmlns", XHTML_NS));
        self.writer.write_event(Event::Start(html))?;
        self.writer.write_event(Event::Start(BytesStart::new("head")))?;
        self.writer.write_event(Event::Start(BytesStart::new("title")))?;
        self.writer.write_event(Event::End(BytesEnd::new("title")))?;
        self.writer.write_event(Event::End(BytesEnd::new("head")))?;
        self.writer.write_event(Event::Start(BytesStart::new("body")))?;
        self.document_open = true;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        if !self.document_open {
            return Err(SinkError::DocumentNotOpen("end_document"));
        }
        if let Some(open) = self.open_elements.last() {
            return Err(SinkError::StillOpen(open.clone()));
        }
        self.writer.write_event(Event::End(BytesEnd::new("body")))?;
        self.writer.write_event(Event::End(BytesEnd::new("html")))?;
        self.document_open = false;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SinkError> {
        if !self.document_open {
            return Err(SinkError::DocumentNotOpen("start_element"));
        }
        let mut start = BytesStart::new(name);
        for (attr_name, attr_value) in attributes {
            start.push_attribute((*attr_name, *attr_value));
        }
        self.writer.write_event(Event::Start(start))?;
        self.open_elements.push(name.to_string());
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        if !self.document_open {
            return Err(SinkError::DocumentNotOpen("end_element"));
        }
        match self.open_elements.last() {
            Some(open) if open == name => {}
            Some(open) => {
                return Err(SinkError::MismatchedClose {
                    expected: open.clone(),
                    got: name.to_string(),
                })
            }
            None => return Err(SinkError::DocumentNotOpen("end_element")),
        }
        self.open_elements.pop();
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), SinkError> {
        if !self.document_open {
            return Err(SinkError::DocumentNotOpen("text"));
        }
        self.writer.write_event(Event::Text(BytesText::new(content)))?;
        Ok(())
    }
}
