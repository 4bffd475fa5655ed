use super::*;

use pretty_assertions::assert_eq;

fn error_at(file: &str, line: i32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(message)
        .with_label(Location::line(file, line), "here")
}

#[test]
fn test_flush_sorts_by_file_then_line() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(error_at("b.spec", 1, "third"));
    queue.add(error_at("a.spec", 9, "second"));
    queue.add(Diagnostic::error(ErrorCode::E9001).with_message("last"));
    queue.add(error_at("a.spec", 2, "first"));

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third", "last"]);
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    assert!(queue.add(error_at("a", 1, "one")));
    assert!(queue.add(error_at("a", 2, "two")));
    assert!(queue.limit_reached());
    assert!(!queue.add(error_at("a", 3, "three")));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_deduplicates_same_location_and_message() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at("a", 1, "dup")));
    assert!(!queue.add(error_at("a", 1, "dup")));
    assert!(queue.add(error_at("a", 1, "other")));
    assert!(queue.add(error_at("a", 2, "dup")));
    assert_eq!(queue.error_count(), 3);
}

#[test]
fn test_warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.add(Diagnostic::warning(ErrorCode::E9001).with_message("w"));
    assert_eq!(queue.len(), 1);
    assert!(queue.has_errors().is_none());
}

#[test]
fn test_emit_error_gives_proof() {
    let mut queue = DiagnosticQueue::new();
    let _proof: ErrorGuaranteed = queue.emit_error(error_at("a", 1, "boom"));
    assert!(queue.has_errors().is_some());
    assert_eq!(queue.peek().count(), 1);
}

#[test]
fn test_too_many_errors() {
    let diag = too_many_errors(20, Location::line("a", 3));
    assert_eq!(diag.code, ErrorCode::E9002);
    assert_eq!(diag.message, "stopped after 20 errors");
}
