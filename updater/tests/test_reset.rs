// Licensed under the Apache-2.0 license


use hostfw_partitions::EraseMode;
use hostfw_updater::reset::FlashResetEngine;
use mock_flash::{event_log, events, FlashEvent, MockArbiter, MockFlash};

const LISTING: &str = "\
Flash info:\n\
-----------\n\
Name          = /dev/mtd6\n\
Total size    = 64MB\n\
ID=05 HBB 0x0009d000..0x0012d000 (actual=0x00090000) [EL--P----]\n\
ID=06 MVPD 0x0012d000..0x001bd000 (actual=0x00090000) [E--P--F-C-]\n\
ID=16 GUARD 0x01bb7000..0x01bbc000 (actual=0x00005000) [E--P--F-C-]\n\
ID=30 CVPD 0x02478000..0x024a8000 (actual=0x00030000) [--P--F-C-]\n";

#[test]
fn test_reset_clears_flagged_partitions_in_listing_order() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone()).with_listing(LISTING),
        MockArbiter::new(log.clone()),
    );

    let outcomes = engine.reset().unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.succeeded()));
    assert_eq!(
        events(&log),
        vec![
            FlashEvent::List,
            FlashEvent::Suspend,
            FlashEvent::Erase("MVPD".to_string(), EraseMode::EccClear),
            FlashEvent::Erase("GUARD".to_string(), EraseMode::EccClear),
            FlashEvent::Erase("CVPD".to_string(), EraseMode::Raw),
            FlashEvent::Resume,
        ]
    );
}

#[test]
fn test_reset_resumes_exactly_once_when_every_erase_fails() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone())
            .with_listing(LISTING)
            .with_failing_erase("MVPD")
            .with_failing_erase("GUARD")
            .with_failing_erase("CVPD"),
        MockArbiter::new(log.clone()),
    );

    let outcomes = engine.reset().unwrap();

    // The full list is still processed and reported.
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| !o.succeeded()));
    let resumes = events(&log)
        .iter()
        .filter(|e| **e == FlashEvent::Resume)
        .count();
    assert_eq!(resumes, 1);
}

#[test]
fn test_reset_continues_past_a_failed_partition() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone())
            .with_listing(LISTING)
            .with_failing_erase("MVPD"),
        MockArbiter::new(log.clone()),
    );

    let outcomes = engine.reset().unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(!outcomes[0].succeeded());
    assert!(outcomes[1].succeeded());
    assert!(outcomes[2].succeeded());
    assert_eq!(events(&log).last(), Some(&FlashEvent::Resume));
}

#[test]
fn test_reset_aborts_before_suspend_when_listing_fails() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone()),
        MockArbiter::new(log.clone()),
    );

    assert!(engine.reset().is_err());
    assert_eq!(events(&log), vec![FlashEvent::List]);
}

#[test]
fn test_reset_aborts_before_erase_when_suspend_fails() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone()).with_listing(LISTING),
        MockArbiter::new(log.clone()).failing_suspend(),
    );

    assert!(engine.reset().is_err());
    assert_eq!(events(&log), vec![FlashEvent::List, FlashEvent::Suspend]);
}

#[test]
fn test_reset_with_nothing_flagged_still_suspends_and_resumes() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone())
            .with_listing("ID=05 HBB 0x0009d000..0x0012d000 (actual=0x00090000) [EL--P----]\n"),
        MockArbiter::new(log.clone()),
    );

    let outcomes = engine.reset().unwrap();

    assert!(outcomes.is_empty());
    assert_eq!(
        events(&log),
        vec![FlashEvent::List, FlashEvent::Suspend, FlashEvent::Resume]
    );
}

#[test]
fn test_clear_guard() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone()),
        MockArbiter::new(log.clone()),
    );

    engine.clear_guard().unwrap();

    assert_eq!(
        events(&log),
        vec![
            FlashEvent::Suspend,
            FlashEvent::Erase("GUARD".to_string(), EraseMode::EccClear),
            FlashEvent::Resume,
        ]
    );
}

#[test]
fn test_clear_guard_resumes_on_erase_failure() {
    let log = event_log();
    let engine = FlashResetEngine::new(
        MockFlash::new(log.clone()).with_failing_erase("GUARD"),
        MockArbiter::new(log.clone()),
    );

    assert!(engine.clear_guard().is_err());
    assert_eq!(events(&log).last(), Some(&FlashEvent::Resume));
}
