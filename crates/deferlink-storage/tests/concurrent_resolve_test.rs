//! Integration test: concurrent resolution racing on one candidate.

use std::sync::Arc;

use chrono::{Duration, Utc};
use deferlink_core::models::{CandidateVisit, Confidence};
use deferlink_core::traits::CandidateStore;
use deferlink_storage::StorageEngine;

fn make_candidate(id: &str) -> CandidateVisit {
    let created = Utc::now() - Duration::seconds(120);
    CandidateVisit {
        id: id.to_string(),
        promo_id: "launch".to_string(),
        domain: "example.com".to_string(),
        user_agent: Some("Mozilla/5.0".to_string()),
        timezone: Some("Europe/Moscow".to_string()),
        language: Some("ru_RU".to_string()),
        screen_size: Some("390x844".to_string()),
        model: Some("iPhone14,2".to_string()),
        idfv: None,
        ip_address: None,
        created_at: created,
        expires_at: created + Duration::hours(48),
        is_resolved: false,
        resolved_at: None,
        match_confidence: None,
        match_details: None,
    }
}

#[test]
fn exactly_one_resolver_wins_per_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("race.db");
    let store = Arc::new(StorageEngine::open(&db_path).unwrap());

    store.insert_candidate(&make_candidate("contested")).unwrap();

    let mut handles = vec![];
    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            store
                .conditional_resolve(
                    "contested",
                    Confidence::new(0.9),
                    &format!("{{\"winner\":{t}}}"),
                )
                .unwrap()
        }));
    }

    let wins: usize = handles
        .into_iter()
        .map(|h| h.join().expect("resolver thread should not panic") as usize)
        .sum();

    assert_eq!(wins, 1, "exactly one concurrent resolve must win");

    // The winner's write is intact and the candidate stays resolved.
    let resolved = store.get_candidate("contested").unwrap().unwrap();
    assert!(resolved.is_resolved);
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.match_confidence.map(|c| c.value()), Some(0.9));
}

#[test]
fn expiry_reaper_racing_resolution_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("reap.db");
    let store = Arc::new(StorageEngine::open(&db_path).unwrap());

    // Candidate already past expiry: read as a candidate earlier, then
    // reaped before the conditional write lands.
    let mut candidate = make_candidate("reaped");
    candidate.expires_at = Utc::now() - Duration::seconds(1);
    store.insert_candidate(&candidate).unwrap();
    store.delete_expired().unwrap();

    let won = store
        .conditional_resolve("reaped", Confidence::new(0.95), "{}")
        .unwrap();
    assert!(!won, "a reaped candidate is a lost race, not an error");
}
