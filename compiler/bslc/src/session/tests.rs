#![allow(clippy::unwrap_used)]

use super::*;

use bsl_engine::{Endian, Length, ProgramBuilder, Scalar};
use bsl_ir::IntWidth;
use pretty_assertions::assert_eq;

/// `len: u8` followed by `len` bytes of data.
fn records() -> Arc<Program> {
    let mut b = ProgramBuilder::new();
    b.read_kept(Scalar::unsigned(IntWidth::W8, Endian::Big), Some("len"));
    b.read_bytes(Length::FromStack, Some("data"));
    b.halt();
    Arc::new(b.finish().unwrap())
}

fn record(data: &[u8]) -> Value {
    Value::Struct(vec![
        ("len".to_owned(), Value::UInt(data.len() as u64)),
        ("data".to_owned(), Value::Bytes(data.to_vec())),
    ])
}

#[test]
fn messages_across_feeds() {
    let mut session = ParseSession::new(records(), EngineConfig::default());

    assert_eq!(session.feed(&[2, b'h']).unwrap(), Vec::<Value>::new());
    assert_eq!(session.pending(), 2);
    assert_eq!(
        session.feed(&[b'i', 1, b'!', 0]).unwrap(),
        vec![record(b"hi"), record(b"!"), record(b"")]
    );
    assert_eq!(session.finish().unwrap(), Vec::<Value>::new());
    assert_eq!(session.messages_parsed(), 3);
    assert_eq!(session.pending(), 0);
}

#[test]
fn truncated_input_fails_on_finish() {
    let mut session = ParseSession::new(records(), EngineConfig::default());
    session.feed(&[3, b'a']).unwrap();
    let err = session.finish().unwrap_err();
    assert!(err.parsed.is_empty());
    assert!(matches!(err.error, EngineError::UnexpectedEof { needed: 2, .. }), "{err}");
}

#[test]
fn error_keeps_messages_completed_before_it() {
    let config = EngineConfig::default().with_max_field_len(100);
    let mut session = ParseSession::new(records(), config);

    let err = session.feed(&[1, b'x', 200]).unwrap_err();
    assert_eq!(err.parsed, vec![record(b"x")]);
    assert!(
        matches!(
            &err.error,
            EngineError::MalformedStream { position: 3, reason, .. }
                if reason == "declared length 200 exceeds the 100-byte limit"
        ),
        "{err}"
    );
    assert_eq!(session.messages_parsed(), 1);
    assert_eq!(session.pending(), 0);

    // The session starts over on fresh input.
    assert_eq!(session.feed(&[1, b'y']).unwrap(), vec![record(b"y")]);
}

#[test]
fn abort_starts_over() {
    let mut session = ParseSession::new(records(), EngineConfig::default());
    session.feed(&[5, 1, 2]).unwrap();
    session.abort();
    assert_eq!(session.pending(), 0);
    assert_eq!(session.feed(&[1, 9]).unwrap(), vec![record(&[9])]);
}

#[test]
fn zero_length_program_does_not_spin() {
    let mut b = ProgramBuilder::new();
    b.halt();
    let mut session = ParseSession::new(Arc::new(b.finish().unwrap()), EngineConfig::default());
    assert_eq!(session.feed(&[]).unwrap(), vec![Value::Struct(Vec::new())]);
}
