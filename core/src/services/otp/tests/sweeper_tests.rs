//! Tests for the background sweeper

use chrono::Duration;
use std::sync::Arc;

use crate::services::otp::{Clock, ManualClock, OtpPolicy, OtpStore, OtpSweeper};

use super::mocks::t0;

const INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

fn setup() -> (Arc<OtpStore>, Arc<ManualClock>) {
    let store = Arc::new(OtpStore::new(OtpPolicy::default()));
    let clock = Arc::new(ManualClock::new(t0()));
    (store, clock)
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_reclaims_dead_records() {
    let (store, clock) = setup();
    store.issue("+910000000001", "123456", t0());
    store.issue("+910000000002", "123456", t0() + Duration::hours(2));

    let sweeper = OtpSweeper::start(store.clone(), clock.clone() as Arc<dyn Clock>, INTERVAL);

    // Nothing happens before the first tick
    clock.set(t0() + Duration::hours(2));
    tokio::time::sleep(INTERVAL / 2).await;
    assert_eq!(store.len(), 2);

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(store.len(), 1);
    assert!(store.get("+910000000002").is_some());

    sweeper.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_keeps_blocked_records() {
    let (store, clock) = setup();
    for _ in 0..6 {
        store.try_issue("+910000000003", "123456", t0());
    }

    let sweeper = OtpSweeper::start(store.clone(), clock.clone() as Arc<dyn Clock>, INTERVAL);

    clock.set(t0() + Duration::minutes(10));
    tokio::time::sleep(INTERVAL * 3).await;
    assert_eq!(store.len(), 1);

    clock.set(t0() + Duration::hours(2));
    tokio::time::sleep(INTERVAL * 2).await;
    assert!(store.is_empty());

    sweeper.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_stops_on_shutdown() {
    let (store, clock) = setup();
    let sweeper = OtpSweeper::start(store.clone(), clock.clone() as Arc<dyn Clock>, INTERVAL);
    assert!(!sweeper.is_finished());

    sweeper.shutdown().await;

    // Records outlive a stopped sweeper
    store.issue("+910000000004", "123456", t0());
    clock.set(t0() + Duration::hours(2));
    tokio::time::sleep(INTERVAL * 5).await;
    assert_eq!(store.len(), 1);
}
