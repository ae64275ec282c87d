use super::*;

#[test]
fn tfstate_parses_api_shape_and_reports_remote_pending() {
    let v = serde_json::json!({
        "id": "7",
        "timestamp": 1580000000,
        "account": "prod",
        "bucket": "states",
        "path": "network/terraform.tfstate",
        "tags": ["default", "network"],
        "last_update": "",
        "force_validation": true,
        "compliance_result": {
            "Initialized": true,
            "Error": false,
            "ErrorMessage": "",
            "PassCount": 3,
            "FailCount": 1,
            "FeaturesResult": {"encryption": true, "tags": false},
            "FeaturesFailures": {"tags": ["missing owner"]}
        }
    });
    let s: TfState = serde_json::from_value(v).expect("parse tfstate");
    assert_eq!(s.id.as_str(), "7");
    assert!(s.remote_pending());
    assert_eq!(s.location(), "states@network/terraform.tfstate");
    assert_eq!(s.last_update_label(), "-");
    assert_eq!(s.compliance_result.label(), "3/4");
    assert_eq!(
        s.compliance_result.verdict(),
        ComplianceVerdict::Failing
    );
    assert_eq!(TfState::validate_path(&s.id), "/tfstates/7/validate");
}

#[test]
fn tfstate_missing_optional_fields_default_to_idle() {
    let s: TfState =
        serde_json::from_str(r#"{"id":"a","bucket":"b","path":"p"}"#).expect("parse tfstate");
    assert!(!s.remote_pending());
    assert_eq!(s.compliance_result.label(), "-");
    assert!(s.tags.is_empty());
}

#[test]
fn compliance_breakdown_lists_failures_per_feature() {
    let mut r = ComplianceResult {
        initialized: true,
        pass_count: 1,
        fail_count: 1,
        ..Default::default()
    };
    r.features_result.insert("encryption".into(), true);
    r.features_result.insert("tags".into(), false);
    r.features_failures
        .insert("tags".into(), vec!["missing owner".into(), "missing env".into()]);

    let b = r.breakdown();
    assert_eq!(b.passing, vec!["encryption".to_string()]);
    assert_eq!(b.failing, vec!["tags".to_string()]);
    assert_eq!(
        b.errors,
        vec![
            "tags: missing owner".to_string(),
            "tags: missing env".to_string()
        ]
    );

    let lines = r.detail_lines();
    assert_eq!(lines.first().map(String::as_str), Some("Passing:"));
    assert!(lines.contains(&"Errors:".to_string()));
}

#[test]
fn compliance_error_shows_message_lines() {
    let r = ComplianceResult {
        initialized: true,
        error: true,
        error_message: "terraform show failed\nexit 1".into(),
        ..Default::default()
    };
    assert_eq!(r.label(), "error");
    assert_eq!(r.detail_lines(), vec!["terraform show failed", "exit 1"]);
}

#[test]
fn log_entry_labels_follow_validation_counts() {
    let v = serde_json::json!({
        "id": "l1",
        "kind": "tfstate",
        "date_time": "2020-01-02 10:00:00",
        "details": "states:network",
        "compliance_errors": 2,
        "compliance_tests": 5,
        "compliance_errors_prev": 0,
        "compliance_tests_prev": 5,
        "lines_added": 25,
        "lines_removed": 4
    });
    let l: LogEntry = serde_json::from_value(v).expect("parse log");
    assert_eq!(l.kind, LogKind::Tfstate);
    assert_eq!(l.result_label(), "FAILING 3/5");
    assert_eq!(l.compliance_change_label(), "PASSING 5/5 -> FAILING 3/5");
    assert_eq!(l.lines_changed_label(), "+25 -4");
}

#[test]
fn log_entry_unknown_kind_is_tolerated() {
    let l: LogEntry =
        serde_json::from_str(r#"{"id":"x","kind":"account"}"#).expect("parse log");
    assert_eq!(l.kind, LogKind::Unknown);
}

#[test]
fn record_item_paths_use_collection() {
    let id = RecordId::from("abc");
    assert_eq!(Feature::item_path(&id), "/features/abc");
    assert_eq!(ForeignResource::item_path(&id), "/foreignresources/abc");
    assert_eq!(LogEntry::item_path(&id), "/logs/abc");
}
