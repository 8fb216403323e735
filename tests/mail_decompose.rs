/*
 * mail_decompose.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Integration test for message decomposition. Drives the engine with a
 * scripted tokenizer and verifies envelope extraction, the XHTML body
 * document, attached-message recursion, and error propagation.
 *
 * Run with:
 *   cargo test --test mail_decompose -- --nocapture
 */

use std::cell::Cell;
use std::io::{Cursor, Read};
use std::sync::Arc;

use smistaposta::{
    decompose, AutoDecoder, DecodeError, DecomposeError, DocumentSink, Metadata, MessageTokenizer,
    PartDescriptor, RawField, Rfc822Decoder, SinkError, StructureError, StructureHandler,
    TokenizerConfig, XhtmlWriter,
};

/// One scripted structural event.
#[derive(Clone)]
enum Event {
    StartMessage,
    StartHeader,
    Field(&'static str, &'static str),
    EndHeader,
    StartMultipart(&'static str),
    EndMultipart,
    StartBodyPart,
    EndBodyPart,
    Preamble(&'static [u8]),
    Epilogue(&'static [u8]),
    Body(&'static str, Option<&'static str>, &'static [u8]),
    EndMessage,
    Fail(&'static str),
}

/// Tokenizer that replays fixed scripts: the first tokenize call replays
/// the first script, the second call the second, and so on (the last script
/// repeats). Lets one instance serve both the outer message and attached
/// messages it contains.
struct ScriptedTokenizer {
    scripts: Vec<Vec<Event>>,
    calls: Cell<usize>,
}

impl ScriptedTokenizer {
    fn new(script: Vec<Event>) -> Self {
        Self::nested(vec![script])
    }

    fn nested(scripts: Vec<Vec<Event>>) -> Self {
        Self {
            scripts,
            calls: Cell::new(0),
        }
    }
}

impl MessageTokenizer for ScriptedTokenizer {
    fn tokenize(
        &self,
        _input: &mut dyn Read,
        _config: &TokenizerConfig,
        handler: &mut dyn StructureHandler,
    ) -> Result<(), StructureError> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        let script = &self.scripts[index.min(self.scripts.len() - 1)];
        for event in script {
            match event {
                Event::StartMessage => handler.start_message()?,
                Event::StartHeader => handler.start_header()?,
                Event::Field(name, raw) => handler.header_field(&RawField::new(*name, *raw))?,
                Event::EndHeader => handler.end_header()?,
                Event::StartMultipart(mime) => {
                    handler.start_multipart(&PartDescriptor::new(*mime, None))?
                }
                Event::EndMultipart => handler.end_multipart()?,
                Event::StartBodyPart => handler.start_body_part()?,
                Event::EndBodyPart => handler.end_body_part()?,
                Event::Preamble(data) => handler.preamble(&mut Cursor::new(data.to_vec()))?,
                Event::Epilogue(data) => handler.epilogue(&mut Cursor::new(data.to_vec()))?,
                Event::Body(mime, charset, payload) => {
                    let descriptor = PartDescriptor::new(*mime, charset.map(str::to_string));
                    handler.body(&descriptor, &mut Cursor::new(payload.to_vec()))?
                }
                Event::EndMessage => handler.end_message()?,
                Event::Fail(message) => return Err(StructureError::malformed(*message)),
            }
        }
        Ok(())
    }
}

fn plain_message_script() -> Vec<Event> {
    vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Field("From", "From: Julien Vermillard <jvermillar@sensor.net>"),
        Event::Field("To", "To: Anna <anna@example.com>, <bruno@example.com>"),
        Event::Field("Subject", "Subject: =?UTF-8?Q?Saluti_da_Roma?="),
        Event::Field("Date", "Date: Fri, 21 Nov 1997 09:55:06 -0600"),
        Event::EndHeader,
        Event::Body("text/plain", Some("utf-8"), b"Hello, World!"),
        Event::EndMessage,
    ]
}

fn run(
    tokenizer: &ScriptedTokenizer,
    registry: &AutoDecoder,
) -> Result<(String, Metadata), DecomposeError> {
    let mut sink = XhtmlWriter::new(Vec::new());
    let mut metadata = Metadata::new();
    decompose(
        tokenizer,
        &mut std::io::empty(),
        &mut sink,
        &mut metadata,
        registry,
    )?;
    let bytes = sink.into_inner();
    Ok((String::from_utf8(bytes).unwrap(), metadata))
}

#[test]
fn plain_message_document_and_envelope() {
    let tokenizer = ScriptedTokenizer::new(plain_message_script());
    let (xhtml, metadata) = run(&tokenizer, &AutoDecoder::standard()).unwrap();

    assert!(xhtml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xhtml.contains("<html xmlns=\"http://www.w3.org/1999/xhtml\">"));
    assert!(xhtml.contains("<body>Hello, World!</body>"));
    assert!(xhtml.ends_with("</html>"));

    assert_eq!(
        metadata.values("message-from"),
        &["Julien Vermillard <jvermillar@sensor.net>".to_string()]
    );
    assert_eq!(
        metadata.values("author"),
        &["Julien Vermillard <jvermillar@sensor.net>".to_string()]
    );
    assert_eq!(
        metadata.values("message-to"),
        &[
            "Anna <anna@example.com>".to_string(),
            "<bruno@example.com>".to_string()
        ]
    );
    assert_eq!(metadata.get("subject"), Some("Saluti da Roma"));
    assert_eq!(metadata.get("creation-date"), Some("1997-11-21T15:55:06Z"));
}

#[test]
fn multipart_brackets_each_part() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Field("Subject", "Subject: due parti"),
        Event::EndHeader,
        Event::StartMultipart("multipart/alternative"),
        Event::Preamble(b"This is a multi-part message in MIME format."),
        Event::StartBodyPart,
        Event::Body("text/plain", Some("utf-8"), b"uno"),
        Event::EndBodyPart,
        Event::StartBodyPart,
        Event::Body("text/html", Some("utf-8"), b"<b>due</b>"),
        Event::EndBodyPart,
        Event::Epilogue(b"trailing noise"),
        Event::EndMultipart,
        Event::EndMessage,
    ]);
    let (xhtml, metadata) = run(&tokenizer, &AutoDecoder::standard()).unwrap();

    assert!(xhtml.contains("<div class=\"email-entry\"><p>uno</p></div>"));
    // the html part is rendered as text content, so its markup is escaped
    assert!(xhtml.contains("<div class=\"email-entry\"><p>&lt;b&gt;due&lt;/b&gt;</p></div>"));
    // preamble and epilogue leave no trace
    assert!(!xhtml.contains("multi-part message"));
    assert!(!xhtml.contains("trailing noise"));
    assert_eq!(metadata.get("subject"), Some("due parti"));
}

#[test]
fn nested_part_headers_do_not_touch_envelope() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Field("Subject", "Subject: esterno"),
        Event::Field("From", "From: Fuori <fuori@example.com>"),
        Event::EndHeader,
        Event::StartMultipart("multipart/mixed"),
        Event::StartBodyPart,
        Event::StartHeader,
        Event::Field("From", "From: Dentro <dentro@example.com>"),
        Event::Field("Subject", "Subject: interno"),
        Event::EndHeader,
        Event::Body("text/plain", None, b"parte"),
        Event::EndBodyPart,
        Event::EndMultipart,
        Event::EndMessage,
    ]);
    let (_, metadata) = run(&tokenizer, &AutoDecoder::standard()).unwrap();

    assert_eq!(metadata.values("subject"), &["esterno".to_string()]);
    assert_eq!(
        metadata.values("message-from"),
        &["Fuori <fuori@example.com>".to_string()]
    );
}

#[test]
fn attached_message_lands_in_same_document() {
    let outer = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Field("From", "From: Fuori <fuori@example.com>"),
        Event::EndHeader,
        Event::StartMultipart("multipart/mixed"),
        Event::StartBodyPart,
        Event::Body("text/plain", None, b"vedi allegato"),
        Event::EndBodyPart,
        Event::StartBodyPart,
        Event::Body("message/rfc822", None, b"raw attached message bytes"),
        Event::EndBodyPart,
        Event::EndMultipart,
        Event::EndMessage,
    ];
    let inner = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Field("From", "From: Dentro <dentro@example.com>"),
        Event::Field("Subject", "Subject: interno"),
        Event::EndHeader,
        Event::Body("text/plain", None, b"testo interno"),
        Event::EndMessage,
    ];
    let tokenizer = Arc::new(ScriptedTokenizer::nested(vec![outer, inner]));
    let registry = Rfc822Decoder::standard_registry(tokenizer.clone());

    let (xhtml, metadata) = run(tokenizer.as_ref(), &registry).unwrap();

    // one document: the attached message's shell was swallowed
    assert_eq!(xhtml.matches("<html").count(), 1);
    assert_eq!(xhtml.matches("</html>").count(), 1);
    assert!(xhtml.contains("vedi allegato"));
    assert!(xhtml.contains("testo interno"));
    // attached-message headers never reach the envelope record
    assert_eq!(
        metadata.values("message-from"),
        &["Fuori <fuori@example.com>".to_string()]
    );
    assert!(metadata.get("subject").is_none());
}

#[test]
fn reruns_are_byte_identical() {
    let first = {
        let tokenizer = ScriptedTokenizer::new(plain_message_script());
        run(&tokenizer, &AutoDecoder::standard()).unwrap()
    };
    let second = {
        let tokenizer = ScriptedTokenizer::new(plain_message_script());
        run(&tokenizer, &AutoDecoder::standard()).unwrap()
    };
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn empty_message_yields_shell_document() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::EndMessage,
    ]);
    let (xhtml, metadata) = run(&tokenizer, &AutoDecoder::standard()).unwrap();
    assert!(xhtml.contains("<body></body>"));
    assert!(metadata.is_empty());
}

#[test]
fn malformed_input_surfaces_as_structure_error() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::Fail("header line over limit"),
    ]);
    let err = run(&tokenizer, &AutoDecoder::standard()).unwrap_err();
    match err {
        DecomposeError::Structure(message) => {
            assert!(message.contains("header line over limit"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unsupported_part_surfaces_as_decode_error() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::Body("application/x-unknown", None, &[0u8, 0xff, 0x10, 0x00]),
        Event::EndMessage,
    ]);
    let err = run(&tokenizer, &AutoDecoder::standard()).unwrap_err();
    match err {
        DecomposeError::Decode(DecodeError::Unsupported(media_type)) => {
            assert_eq!(media_type, "application/x-unknown")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unsupported_part_inside_attached_message_keeps_its_kind() {
    let outer = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::Body("message/rfc822", None, b"raw attached message bytes"),
        Event::EndMessage,
    ];
    let inner = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::Body("application/x-unknown", None, &[0u8, 0xff, 0x10, 0x00]),
        Event::EndMessage,
    ];
    let tokenizer = Arc::new(ScriptedTokenizer::nested(vec![outer, inner]));
    let registry = Rfc822Decoder::standard_registry(tokenizer.clone());

    let err = run(tokenizer.as_ref(), &registry).unwrap_err();
    // the inner failure arrives unwrapped, not nested in a message error
    match err {
        DecomposeError::Decode(DecodeError::Unsupported(media_type)) => {
            assert_eq!(media_type, "application/x-unknown")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Sink that rejects every element open, for error-path checks.
struct RejectingSink;

impl DocumentSink for RejectingSink {
    fn start_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn start_element(&mut self, _name: &str, _attributes: &[(&str, &str)]) -> Result<(), SinkError> {
        Err(SinkError::DocumentNotOpen("start_element"))
    }

    fn end_element(&mut self, _name: &str) -> Result<(), SinkError> {
        Err(SinkError::DocumentNotOpen("end_element"))
    }

    fn text(&mut self, _content: &str) -> Result<(), SinkError> {
        Err(SinkError::DocumentNotOpen("text"))
    }
}

#[test]
fn sink_rejection_surfaces_as_sink_error() {
    let tokenizer = ScriptedTokenizer::new(vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::StartMultipart("multipart/mixed"),
        Event::StartBodyPart,
    ]);
    let mut sink = RejectingSink;
    let mut metadata = Metadata::new();
    let registry = AutoDecoder::standard();
    let err = decompose(
        &tokenizer,
        &mut std::io::empty(),
        &mut sink,
        &mut metadata,
        &registry,
    )
    .unwrap_err();
    assert!(matches!(err, DecomposeError::Sink(_)));
}

/// Sink that accepts structure but rejects character content.
struct TextRejectingSink;

impl DocumentSink for TextRejectingSink {
    fn start_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn start_element(&mut self, _name: &str, _attributes: &[(&str, &str)]) -> Result<(), SinkError> {
        Ok(())
    }

    fn end_element(&mut self, _name: &str) -> Result<(), SinkError> {
        Ok(())
    }

    fn text(&mut self, _content: &str) -> Result<(), SinkError> {
        Err(SinkError::DocumentNotOpen("text"))
    }
}

#[test]
fn sink_rejection_inside_attached_message_keeps_its_kind() {
    let outer = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::Body("message/rfc822", None, b"raw attached message bytes"),
        Event::EndMessage,
    ];
    let inner = vec![
        Event::StartMessage,
        Event::StartHeader,
        Event::EndHeader,
        Event::Body("text/plain", None, b"testo interno"),
        Event::EndMessage,
    ];
    let tokenizer = Arc::new(ScriptedTokenizer::nested(vec![outer, inner]));
    let registry = Rfc822Decoder::standard_registry(tokenizer.clone());
    let mut sink = TextRejectingSink;
    let mut metadata = Metadata::new();

    let err = decompose(
        tokenizer.as_ref(),
        &mut std::io::empty(),
        &mut sink,
        &mut metadata,
        &registry,
    )
    .unwrap_err();
    assert!(matches!(err, DecomposeError::Sink(_)));
}
