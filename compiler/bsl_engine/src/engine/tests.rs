#![allow(clippy::unwrap_used)]

use super::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn call_then_return() {
    let mut engine = Engine::with_capacity(64);
    engine.advance_to_instruction(InstrId::new(1));
    engine
        .call_instruction(InstrId::new(10), InstrId::new(2))
        .unwrap();
    assert_eq!(engine.ip(), Some(InstrId::new(10)));
    assert_eq!(engine.depth(), 5);

    engine.return_to_instruction().unwrap();
    assert_eq!(engine.ip(), Some(InstrId::new(2)));
    assert_eq!(engine.depth(), 0);
}

#[test]
fn exhausted_call_keeps_ip() {
    // An InstrId slot is 5 bytes; 5 free bytes are not enough.
    let mut engine = Engine::with_capacity(5);
    engine.advance_to_instruction(InstrId::new(4));
    let err = engine
        .call_instruction(InstrId::new(9), InstrId::new(5))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::StackExhausted {
            ip: Some(InstrId::new(4)),
            requested: 5,
            available: 5,
        }
    );
    assert_eq!(engine.ip(), Some(InstrId::new(4)));
    assert_eq!(engine.depth(), 0);
}

#[test]
fn return_without_call_underflows() {
    let mut engine = Engine::with_capacity(64);
    engine.advance_to_instruction(InstrId::new(3));
    assert_eq!(
        engine.return_to_instruction(),
        Err(EngineError::StackUnderflow {
            ip: Some(InstrId::new(3)),
            requested: 5,
            depth: 0,
        })
    );
}

#[test]
fn return_over_data_is_a_type_mismatch() {
    let mut engine = Engine::with_capacity(64);
    // A u32 slot is as wide as an InstrId slot; only the tag differs.
    engine.push(7u32).unwrap();
    assert_eq!(
        engine.return_to_instruction(),
        Err(EngineError::SlotTypeMismatch {
            ip: None,
            expected: "InstrId",
            found: "u32",
        })
    );
    assert_eq!(engine.pop_and_get::<u32>(), Ok(7));
}

#[test]
fn slots_through_engine() {
    let mut engine = Engine::with_capacity(64);
    let slot = engine.push_default::<u64>().unwrap();
    engine.store(slot, 42).unwrap();
    engine.update_top::<u64>(|v| v + 1).unwrap();
    assert_eq!(engine.load(slot), Ok(43));
    assert_eq!(engine.peek::<u64>(), Ok(43));
}

#[test]
fn reset_is_idempotent() {
    let mut engine = Engine::with_capacity(64);
    engine.push(1u8).unwrap();
    engine.advance_to_instruction(InstrId::new(8));
    engine.stream_position = Some(100);

    engine.reset();
    let once = (engine.depth(), engine.ip(), engine.stream_position());
    engine.reset();
    let twice = (engine.depth(), engine.ip(), engine.stream_position());

    assert_eq!(once, (0, None, None));
    assert_eq!(once, twice);
    assert_eq!(engine.space(), 64);
}

proptest! {
    #[test]
    fn nested_calls_unwind_like_parentheses(
        frames in proptest::collection::vec((any::<u32>(), any::<u32>()), 1..50)
    ) {
        let mut engine = Engine::with_capacity(50 * 5 + 1);
        for (target, return_to) in &frames {
            engine
                .call_instruction(InstrId::new(*target), InstrId::new(*return_to))
                .unwrap();
        }
        prop_assert_eq!(engine.ip(), Some(InstrId::new(frames[frames.len() - 1].0)));

        for _ in &frames {
            engine.return_to_instruction().unwrap();
        }
        prop_assert_eq!(engine.ip(), Some(InstrId::new(frames[0].1)));
        prop_assert_eq!(engine.depth(), 0);
    }
}
