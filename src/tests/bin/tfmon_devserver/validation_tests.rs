use super::*;

fn feature(name: &str, source: &str, disabled: bool) -> Feature {
    Feature {
        id: RecordId::new(name),
        timestamp: 0,
        name: name.to_string(),
        source: source.to_string(),
        tags: Vec::new(),
        disabled,
    }
}

#[test]
fn evaluate_counts_enabled_features_only() {
    let features = vec![
        feature("encryption", "Scenario: buckets are encrypted", false),
        feature("tags", "Scenario: tags\n  FAIL missing owner tag\n", false),
        feature("legacy", "FAIL always", true),
    ];

    let result = evaluate(&features);

    assert!(result.initialized);
    assert_eq!(result.pass_count, 1);
    assert_eq!(result.fail_count, 1);
    assert_eq!(result.features_result.get("encryption"), Some(&true));
    assert_eq!(result.features_result.get("tags"), Some(&false));
    assert!(!result.features_result.contains_key("legacy"));
    assert_eq!(
        result.features_failures.get("tags"),
        Some(&vec!["FAIL missing owner tag".to_string()])
    );
}

#[test]
fn validation_log_carries_previous_result() {
    let prev = evaluate(&[feature("a", "FAIL", false)]);
    let state = TfState {
        id: RecordId::new("s1"),
        timestamp: 0,
        account: "prod".to_string(),
        bucket: "b".to_string(),
        path: "p/terraform.tfstate".to_string(),
        tags: Vec::new(),
        last_update: "2024-01-02T03:04:05Z".to_string(),
        compliance_result: evaluate(&[feature("a", "ok", false), feature("b", "ok", false)]),
        force_validation: false,
    };

    let entry = validation_log(RecordId::new("l1"), &state, &prev);

    assert_eq!(entry.kind, LogKind::Tfstate);
    assert_eq!(entry.details, "b:p/terraform.tfstate");
    assert_eq!((entry.compliance_errors, entry.compliance_tests), (0, 2));
    assert_eq!(
        (entry.compliance_errors_prev, entry.compliance_tests_prev),
        (1, 1)
    );
    assert!(entry.compliance_prev);
    assert_eq!(entry.compliance_change_label(), "FAILING 0/1 -> PASSING 2/2");
}
