use super::*;

use pretty_assertions::assert_eq;

#[test]
fn builds_nested_structs() {
    let mut b = ValueBuilder::new();
    b.field("version", Value::UInt(1));
    b.enter("header");
    b.field("len", Value::UInt(2));
    b.field("body", Value::Bytes(vec![0xab, 0xcd]));
    b.leave();
    b.field("flags", Value::Bitset {
        bits: 5,
        labels: vec!["A".to_owned(), "C".to_owned()],
    });
    b.end_message();

    let messages = b.take_messages();
    assert_eq!(messages.len(), 1);
    let msg = &messages[0];
    assert_eq!(msg.get("version").and_then(Value::as_uint), Some(1));
    assert_eq!(
        msg.get("header").and_then(|h| h.get("body")),
        Some(&Value::Bytes(vec![0xab, 0xcd]))
    );
    assert_eq!(
        msg.to_string(),
        "{ version: 1, header: { len: 2, body: 0xabcd }, flags: (A|C) }"
    );
    assert!(b.take_messages().is_empty());
}

#[test]
fn end_message_closes_open_frames() {
    let mut b = ValueBuilder::new();
    b.enter("a");
    b.field("x", Value::SInt(-1));
    b.end_message();
    assert_eq!(
        b.take_messages(),
        vec![Value::Struct(vec![(
            "a".to_owned(),
            Value::Struct(vec![("x".to_owned(), Value::SInt(-1))])
        )])]
    );
}

#[test]
fn stray_leave_is_ignored() {
    let mut b = ValueBuilder::new();
    b.leave();
    b.field("x", Value::UInt(0));
    b.end_message();
    assert_eq!(b.take_messages()[0].get("x"), Some(&Value::UInt(0)));
}

#[test]
fn clear_partial_discards_fields() {
    let mut b = ValueBuilder::new();
    b.enter("half");
    b.field("x", Value::UInt(0));
    b.clear_partial();
    b.end_message();
    assert_eq!(b.take_messages(), vec![Value::Struct(Vec::new())]);
}
