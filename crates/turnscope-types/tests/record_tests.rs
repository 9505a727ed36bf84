use turnscope_types::{Record, RecordKind, SessionKey};

#[test]
fn test_record_without_session_id_deserializes() {
    let record: Record = serde_json::from_str(r#"{"timestamp": 12.5, "kind": "singleton"}"#).unwrap();
    assert_eq!(record.timestamp, 12.5);
    assert_eq!(record.kind, RecordKind::Singleton);
    assert!(record.session_id.is_none());
}

#[test]
fn test_record_session_id_is_transparent() {
    let record = Record::grouped(3.0).with_session("conv-42");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["session_id"], "conv-42");
    assert_eq!(json["kind"], "grouped");
    assert_eq!(record.session_id, Some(SessionKey::new("conv-42")));
}

#[test]
fn test_record_without_session_id_omits_field() {
    let json = serde_json::to_value(Record::grouped(1.0)).unwrap();
    assert!(json.get("session_id").is_none());
}
