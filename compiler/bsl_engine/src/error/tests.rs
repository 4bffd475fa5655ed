use super::*;

use pretty_assertions::assert_eq;

#[test]
fn display_includes_instruction_pointer() {
    let err = EngineError::StackExhausted {
        ip: Some(InstrId::new(12)),
        requested: 9,
        available: 4,
    };
    assert_eq!(
        err.to_string(),
        "stack exhausted at #12: slot of 9 bytes, 4 free"
    );

    let idle = EngineError::InvalidInstruction { ip: None };
    assert_eq!(idle.to_string(), "invalid instruction pointer <idle>");
}

#[test]
fn stack_faults_carry_ip() {
    let ip = Some(InstrId::new(3));
    let err = StackFault::Underflow {
        requested: 9,
        depth: 0,
    }
    .at(ip);
    assert_eq!(err.ip(), ip);
    assert_eq!(err.code(), ErrorCode::E2002);
}

#[test]
fn engine_error_to_diagnostic() {
    let diag = Diagnostic::from(EngineError::StackExhausted {
        ip: Some(InstrId::new(0)),
        requested: 5,
        available: 1,
    });
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.notes.len(), 1);

    let diag = Diagnostic::from(EngineError::UnbalancedStack {
        ip: Some(InstrId::new(7)),
        depth: 9,
    });
    assert_eq!(diag.code, ErrorCode::E2007);
    assert!(diag.notes.is_empty());
}

#[test]
fn program_error_codes() {
    assert_eq!(
        ProgramError::UndefinedLabel("body".to_owned()).to_string(),
        "undefined label: `body`"
    );
    let diag = ProgramError::RedefinedLabel("x".to_owned())
        .into_diagnostic(Location::line("m.spec", 3));
    assert_eq!(diag.code, ErrorCode::E3002);
    assert!(diag.code.is_program_error());
}
