use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::session::{MemoryCredentialStore, ReloadReason, SessionContext};

#[test]
fn truncate_keeps_short_bodies_and_marks_cut_ones() {
    assert_eq!(truncate("  not found \n", 20), "not found");
    assert_eq!(truncate("abcdef", 3), "abc...");
}

#[test]
fn gateway_trims_trailing_slash_from_base_url() {
    let session = SessionContext::new(Arc::new(MemoryCredentialStore::default()));
    let gw = Gateway::new("http://panel:8080/", session, Duration::from_secs(1)).expect("gateway");
    assert_eq!(gw.url("/tfstates"), "http://panel:8080/tfstates");
}

#[tokio::test]
async fn missing_credential_fails_fast_and_requests_reload() {
    let session = SessionContext::new(Arc::new(MemoryCredentialStore::default()));
    // Port 9 (discard) would hang or refuse; no request must be attempted at all.
    let gw = Gateway::new("http://127.0.0.1:9", session.clone(), Duration::from_secs(1))
        .expect("gateway");

    let err = gw
        .get::<serde_json::Value>("/tfstates")
        .await
        .expect_err("must fail without credential");
    assert!(matches!(err, GatewayError::MissingCredential));
    assert!(err.is_session_reset());
    assert_eq!(
        session.last_reload().map(|e| e.reason),
        Some(ReloadReason::MissingCredential)
    );
}

#[tokio::test]
async fn dispatch_skips_success_callback_but_always_finishes() {
    let session = SessionContext::new(Arc::new(MemoryCredentialStore::default()));
    let gw = Gateway::new("http://127.0.0.1:9", session, Duration::from_secs(1)).expect("gateway");

    let succeeded = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let finished = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let (s, f) = (succeeded.clone(), finished.clone());
    gw.dispatch::<serde_json::Value, _, _>(
        Method::Get,
        "/tfstates",
        None,
        move |_| s.store(true, std::sync::atomic::Ordering::SeqCst),
        move || f.store(true, std::sync::atomic::Ordering::SeqCst),
    )
    .await
    .expect("join");

    assert!(!succeeded.load(std::sync::atomic::Ordering::SeqCst));
    assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
}
