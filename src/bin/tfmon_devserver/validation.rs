use super::*;

/// Simulated compliance run over the enabled features. A feature fails when
/// any line of its source contains `FAIL`; those lines become its messages.
pub(super) fn evaluate(features: &[Feature]) -> ComplianceResult {
    let mut result = ComplianceResult {
        initialized: true,
        ..ComplianceResult::default()
    };
    for f in features.iter().filter(|f| !f.disabled) {
        let failures: Vec<String> = f
            .source
            .lines()
            .filter(|l| l.contains("FAIL"))
            .map(|l| l.trim().to_string())
            .collect();
        let passed = failures.is_empty();
        result.features_result.insert(f.name.clone(), passed);
        if passed {
            result.pass_count += 1;
        } else {
            result.fail_count += 1;
            result.features_failures.insert(f.name.clone(), failures);
        }
    }
    result
}

pub(super) fn validation_log(
    id: RecordId,
    state: &TfState,
    prev: &ComplianceResult,
) -> LogEntry {
    let current = &state.compliance_result;
    LogEntry {
        id,
        timestamp: now_unix(),
        kind: LogKind::Tfstate,
        date_time: state.last_update.clone(),
        details: format!("{}:{}", state.bucket, state.path),
        compliance_errors: current.fail_count,
        compliance_tests: current.total(),
        compliance_errors_prev: prev.fail_count,
        compliance_tests_prev: prev.total(),
        lines_added: 0,
        lines_removed: 0,
        state_diff_html: None,
        compliance_features: Some(current.features_result.clone()),
        compliance_fail_messages: Some(current.features_failures.clone()),
        compliance_prev: prev.initialized,
    }
}

/// Keeps the tfstate pending for the configured delay, then stores the result
/// and appends a log entry.
pub(super) fn spawn_validation(state: Arc<AppState>, id: RecordId) {
    tokio::spawn(async move {
        tokio::time::sleep(state.validation_delay).await;

        let log_id = match new_record_id() {
            Ok(log_id) => log_id,
            Err(_) => {
                warn!(id = %id, "could not allocate a log id; validation dropped");
                return;
            }
        };

        let mut guard = state.db.write().await;
        let db = &mut *guard;
        let result = evaluate(&db.features);
        let Some(tf) = db.tfstates.iter_mut().find(|s| s.id == id) else {
            debug!(id = %id, "tfstate deleted before validation finished");
            return;
        };
        let prev = std::mem::replace(&mut tf.compliance_result, result);
        tf.force_validation = false;
        tf.last_update = now_rfc3339();
        db.logs.push(validation_log(log_id, tf, &prev));
        info!(id = %id, "validation finished");
    });
}

#[cfg(test)]
#[path = "../../tests/bin/tfmon_devserver/validation_tests.rs"]
mod tests;
