#![allow(clippy::unwrap_used)]

use super::*;

use bsl_ir::{BitsetLabel, BitsetType, Id, IntWidth, Location};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{EngineConfig, ProgramBuilder, ValueBuilder};

/// magic, version, flags, length-prefixed body, counted list of entries.
fn message_program() -> Program {
    let loc = Location::line("msg.spec", 1);
    let flags = BitsetType::new(
        IntWidth::W8,
        vec![
            BitsetLabel::new(Id::new("Flags::A", loc.clone()), 0),
            BitsetLabel::new(Id::new("Flags::B", loc.clone()), 1),
            BitsetLabel::new(Id::new("Flags::C", loc.clone()), 2),
        ],
        &loc,
    )
    .unwrap();
    let byte = Scalar::unsigned(IntWidth::W8, crate::Endian::Big);

    let mut b = ProgramBuilder::new();
    let head = b.label("loop");
    let done = b.label("done");
    let item = b.label("item");

    b.expect(Scalar::unsigned(IntWidth::W16, crate::Endian::Big), 0xcafe);
    b.read(byte, Some("version"));
    b.read_bitset(&flags, crate::Endian::Big, Some("flags"));
    b.read_kept(byte, Some("len"));
    b.read_bytes(Length::FromStack, Some("body"));
    b.read_kept(byte, Some("count"));
    b.bind(head).unwrap();
    b.dup();
    b.jump_if_zero(done);
    b.call(item);
    b.decrement();
    b.jump(head);
    b.bind(done).unwrap();
    b.drop_top();
    b.halt();
    b.bind(item).unwrap();
    b.enter("entry");
    b.read(Scalar::signed(IntWidth::W16, crate::Endian::Little), Some("value"));
    b.leave();
    b.ret();
    b.finish().unwrap()
}

const MESSAGE: [u8; 13] = [
    0xca, 0xfe, // magic
    0x01, // version
    0x05, // flags A|C
    0x03, b'a', b'b', b'c', // body
    0x02, // count
    0x01, 0x00, // entry 1
    0xff, 0xff, // entry -1
];

fn expected() -> Value {
    let entry = |v| Value::Struct(vec![("value".to_owned(), Value::SInt(v))]);
    Value::Struct(vec![
        ("version".to_owned(), Value::UInt(1)),
        (
            "flags".to_owned(),
            Value::Bitset {
                bits: 5,
                labels: vec!["A".to_owned(), "C".to_owned()],
            },
        ),
        ("len".to_owned(), Value::UInt(3)),
        ("body".to_owned(), Value::Bytes(b"abc".to_vec())),
        ("count".to_owned(), Value::UInt(2)),
        ("entry".to_owned(), entry(1)),
        ("entry".to_owned(), entry(-1)),
    ])
}

/// Run until the engine asks for more input, collecting completions.
fn drain(
    engine: &mut Engine,
    program: &Program,
    stream: &ByteStream,
    sink: &mut ValueBuilder,
) -> Result<Vec<u64>, EngineError> {
    let mut completed = Vec::new();
    loop {
        match engine.run(program, stream, sink)? {
            Outcome::Complete { position } => completed.push(position),
            Outcome::NeedMore { .. } => return Ok(completed),
        }
    }
}

#[test]
fn parses_complete_message() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let stream = ByteStream::complete(MESSAGE.to_vec());
    let mut sink = ValueBuilder::new();

    let outcome = engine.run(&program, &stream, &mut sink).unwrap();
    assert_eq!(outcome, Outcome::Complete { position: 13 });
    assert_eq!(sink.take_messages(), vec![expected()]);
    assert_eq!(engine.ip(), None);
    assert_eq!(engine.depth(), 0);
    assert_eq!(engine.stream_position(), Some(13));
}

#[test]
fn reports_bytes_still_needed() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let mut stream = ByteStream::new();
    stream.extend(&[0xca]);
    let mut sink = ValueBuilder::new();

    assert_eq!(
        engine.run(&program, &stream, &mut sink),
        Ok(Outcome::NeedMore { needed: 1 })
    );
    assert_eq!(engine.ip(), Some(InstrId::new(0)));
    assert_eq!(engine.stream_position(), Some(0));
}

#[test]
fn resumes_at_every_split_point() {
    let program = message_program();
    for split in 0..=MESSAGE.len() {
        let mut engine = Engine::with_capacity(256);
        let mut stream = ByteStream::new();
        let mut sink = ValueBuilder::new();

        stream.extend(&MESSAGE[..split]);
        let mut done = drain(&mut engine, &program, &stream, &mut sink).unwrap();
        stream.extend(&MESSAGE[split..]);
        done.extend(drain(&mut engine, &program, &stream, &mut sink).unwrap());

        assert_eq!(done, vec![13], "split at {split}");
        assert_eq!(sink.take_messages(), vec![expected()], "split at {split}");
    }
}

#[test]
fn back_to_back_messages_with_release() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let mut stream = ByteStream::new();
    let mut sink = ValueBuilder::new();

    stream.extend(&MESSAGE);
    stream.extend(&MESSAGE);
    let done = drain(&mut engine, &program, &stream, &mut sink).unwrap();
    assert_eq!(done, vec![13, 26]);

    stream.release(26);
    stream.extend(&MESSAGE);
    let done = drain(&mut engine, &program, &stream, &mut sink).unwrap();
    assert_eq!(done, vec![39]);
    assert_eq!(sink.take_messages().len(), 3);
}

#[test]
fn truncated_finished_stream_is_eof() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let stream = ByteStream::complete(MESSAGE[..6].to_vec());

    let err = engine.run(&program, &stream, &mut ()).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnexpectedEof {
            ip: Some(InstrId::new(4)),
            position: 5,
            needed: 2,
        }
    );
}

#[test]
fn bad_magic_is_malformed() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let stream = ByteStream::complete(vec![0xbe, 0xef]);

    let err = engine.run(&program, &stream, &mut ()).unwrap_err();
    assert_eq!(
        err,
        EngineError::MalformedStream {
            ip: Some(InstrId::new(0)),
            position: 0,
            reason: "expected 0xcafe, found 0xbeef".to_owned(),
        }
    );
}

#[test]
fn oversized_declared_length_is_malformed() {
    let program = message_program();
    let config = EngineConfig::default()
        .with_stack_capacity(256)
        .with_max_field_len(2);
    let mut engine = Engine::new(config);
    let mut stream = ByteStream::new();
    // Not finished: the length check fires before waiting for the body.
    stream.extend(&MESSAGE[..5]);

    let err = engine.run(&program, &stream, &mut ()).unwrap_err();
    assert!(
        matches!(err, EngineError::MalformedStream { ip: Some(ip), .. } if ip == InstrId::new(4)),
        "{err}"
    );
}

#[test]
fn undersized_stack_is_exhausted() {
    let program = message_program();
    // Room for exactly one u64 slot plus slack.
    let mut engine = Engine::with_capacity(10);
    let stream = ByteStream::complete(MESSAGE.to_vec());

    let err = engine.run(&program, &stream, &mut ()).unwrap_err();
    assert_eq!(
        err,
        EngineError::StackExhausted {
            ip: Some(InstrId::new(6)),
            requested: 9,
            available: 1,
        }
    );
}

#[test]
fn halt_requires_empty_stack() {
    let mut b = ProgramBuilder::new();
    b.push(1);
    b.halt();
    let program = b.finish().unwrap();
    let mut engine = Engine::with_capacity(64);

    assert_eq!(
        engine.run(&program, &ByteStream::new(), &mut ()),
        Err(EngineError::UnbalancedStack {
            ip: Some(InstrId::new(1)),
            depth: 9,
        })
    );
}

#[test]
fn drop_on_empty_stack_underflows() {
    let mut b = ProgramBuilder::new();
    b.drop_top();
    b.halt();
    let program = b.finish().unwrap();
    let mut engine = Engine::with_capacity(64);

    let err = engine
        .run(&program, &ByteStream::new(), &mut ())
        .unwrap_err();
    assert_eq!(err.ip(), Some(InstrId::new(0)));
    assert!(matches!(err, EngineError::StackUnderflow { .. }));
}

#[test]
fn running_off_the_end_is_invalid() {
    let mut b = ProgramBuilder::new();
    b.push(0);
    let program = b.finish().unwrap();
    let mut engine = Engine::with_capacity(64);

    assert_eq!(
        engine.run(&program, &ByteStream::new(), &mut ()),
        Err(EngineError::InvalidInstruction {
            ip: Some(InstrId::new(1)),
        })
    );
}

#[test]
fn skip_fixed_and_from_stack() {
    let byte = Scalar::unsigned(IntWidth::W8, crate::Endian::Big);
    let mut b = ProgramBuilder::new();
    b.skip(Length::Fixed(2));
    b.read_kept(byte, None);
    b.skip(Length::FromStack);
    b.read(byte, Some("last"));
    b.halt();
    let program = b.finish().unwrap();

    let mut engine = Engine::with_capacity(64);
    let mut sink = ValueBuilder::new();
    let stream = ByteStream::complete(vec![9, 9, 3, 7, 7, 7, 42]);
    assert_eq!(
        engine.run(&program, &stream, &mut sink),
        Ok(Outcome::Complete { position: 7 })
    );
    assert_eq!(
        sink.take_messages()[0].get("last"),
        Some(&Value::UInt(42))
    );
}

#[test]
fn reset_recovers_after_error() {
    let program = message_program();
    let mut engine = Engine::with_capacity(256);
    let bad = ByteStream::complete(vec![0, 0]);
    assert!(engine.run(&program, &bad, &mut ()).is_err());

    engine.reset();
    let good = ByteStream::complete(MESSAGE.to_vec());
    let mut sink = ValueBuilder::new();
    assert_eq!(
        engine.run(&program, &good, &mut sink),
        Ok(Outcome::Complete { position: 13 })
    );
}

proptest! {
    #[test]
    fn arbitrary_chunking_matches_single_shot(
        chunks in proptest::collection::vec(1usize..6, 1..30)
    ) {
        let program = message_program();
        let mut engine = Engine::with_capacity(256);
        let mut stream = ByteStream::new();
        let mut sink = ValueBuilder::new();
        let mut completed = Vec::new();

        let mut rest: &[u8] = &MESSAGE;
        for size in chunks {
            let (chunk, tail) = rest.split_at(size.min(rest.len()));
            rest = tail;
            stream.extend(chunk);
            completed.extend(drain(&mut engine, &program, &stream, &mut sink).unwrap());
        }
        stream.extend(rest);
        completed.extend(drain(&mut engine, &program, &stream, &mut sink).unwrap());

        prop_assert_eq!(completed, vec![13]);
        prop_assert_eq!(sink.take_messages(), vec![expected()]);
    }
}
