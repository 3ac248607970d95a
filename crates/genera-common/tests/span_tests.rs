use super::*;

#[test]
fn test_span_end_and_display() {
    let span = SourceSpan::new("model/account.pure", 12, 30);
    assert_eq!(span.end(), 42);
    assert_eq!(span.to_string(), "model/account.pure:12..42");
}

#[test]
fn test_span_end_saturates() {
    let span = SourceSpan::new("big.pure", u32::MAX - 1, 10);
    assert_eq!(span.end(), u32::MAX);
}

#[test]
fn test_span_serializes_file_and_offsets() {
    let span = SourceSpan::new("a.pure", 1, 2);
    let json = serde_json::to_value(&span).expect("span serializes");
    assert_eq!(json["file"], "a.pure");
    assert_eq!(json["start"], 1);
    assert_eq!(json["length"], 2);

    let back: SourceSpan = serde_json::from_value(json).expect("span deserializes");
    assert_eq!(back, span);
}
