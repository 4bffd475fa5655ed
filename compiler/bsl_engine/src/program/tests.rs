#![allow(clippy::unwrap_used)]

use super::*;

use bsl_ir::IntWidth;
use pretty_assertions::assert_eq;

use crate::{Endian, Scalar};

fn byte() -> Scalar {
    Scalar::unsigned(IntWidth::W8, Endian::Big)
}

#[test]
fn valid_program() {
    let program = Program::from_parts(
        vec![
            Instr::Read {
                scalar: byte(),
                field: Some(FieldId::new(0)),
                keep: false,
            },
            Instr::Halt,
        ],
        vec!["tag".to_owned()],
        Vec::new(),
        InstrId::new(0),
    )
    .unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(program.field_name(FieldId::new(0)), "tag");
    assert_eq!(program.get(InstrId::new(1)), Some(&Instr::Halt));
    assert_eq!(program.get(InstrId::new(2)), None);
}

#[test]
fn jump_outside_program() {
    let err = Program::from_parts(
        vec![Instr::Jump(InstrId::new(5)), Instr::Halt],
        Vec::new(),
        Vec::new(),
        InstrId::new(0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ProgramError::InvalidTarget {
            at: InstrId::new(0),
            reason: "target #5 is outside the program".to_owned(),
        }
    );
}

#[test]
fn entry_outside_program() {
    let err = Program::from_parts(Vec::new(), Vec::new(), Vec::new(), InstrId::new(0));
    assert!(matches!(err, Err(ProgramError::InvalidTarget { .. })));
}

#[test]
fn unknown_field_and_layout() {
    let err = Program::from_parts(
        vec![Instr::Enter(FieldId::new(1)), Instr::Halt],
        vec!["only".to_owned()],
        Vec::new(),
        InstrId::new(0),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid reference at #0: unknown field#1");

    let err = Program::from_parts(
        vec![
            Instr::ReadBitset {
                scalar: byte(),
                layout: LayoutId::new(0),
                field: None,
            },
            Instr::Halt,
        ],
        Vec::new(),
        Vec::new(),
        InstrId::new(0),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid reference at #0: unknown layout#0");
}

#[test]
fn layout_width_must_match_read() {
    let err = Program::from_parts(
        vec![
            Instr::ReadBitset {
                scalar: byte(),
                layout: LayoutId::new(0),
                field: None,
            },
            Instr::Halt,
        ],
        Vec::new(),
        vec![BitsetLayout::new(IntWidth::W16, Vec::new())],
        InstrId::new(0),
    );
    assert!(matches!(err, Err(ProgramError::InvalidTarget { .. })));
}

#[test]
fn layout_position_beyond_width() {
    let layout = BitsetLayout::new(
        IntWidth::W8,
        vec![("A".to_owned(), 0), ("X".to_owned(), 70)],
    );
    let err = Program::from_parts(
        vec![
            Instr::ReadBitset {
                scalar: byte(),
                layout: LayoutId::new(0),
                field: None,
            },
            Instr::Halt,
        ],
        Vec::new(),
        vec![layout],
        InstrId::new(0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ProgramError::InvalidTarget {
            at: InstrId::new(0),
            reason: "layout#0 puts `X` at bit 70 of a 8-bit value".to_owned(),
        }
    );
}
