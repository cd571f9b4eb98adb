use hunt_core::DwellTracker;

#[test]
fn miss_resets_accumulator() {
    let mut dwell = DwellTracker::new();
    for _ in 0..11 {
        dwell.update(true, 0.1, 1.2);
    }
    assert!(dwell.elapsed() > 1.0);
    assert!(!dwell.update(false, 0.1, 1.2));
    assert_eq!(dwell.elapsed(), 0.0);
}

#[test]
fn dwell_just_under_threshold_then_lost_starts_over() {
    let threshold = 1.2;
    let mut dwell = DwellTracker::new();
    // Gaze for threshold - epsilon, lose it, gaze again: the earlier time
    // must not count.
    for _ in 0..11 {
        assert!(!dwell.update(true, 0.1, threshold)); // 1.1s, still under
    }
    dwell.update(false, 0.1, threshold);
    for _ in 0..11 {
        assert!(!dwell.update(true, 0.1, threshold));
    }
}

#[test]
fn dwell_past_threshold_detects_and_stays_detected() {
    let threshold = 1.2;
    let mut dwell = DwellTracker::new();
    let mut detected = false;
    for _ in 0..13 {
        detected = dwell.update(true, 0.1, threshold);
    }
    assert!(detected, "1.3s of gaze must exceed a 1.2s threshold");
    // Level-triggered: keeps reporting true while still gazed.
    assert!(dwell.update(true, 0.1, threshold));
    assert!(dwell.update(true, 0.1, threshold));
}

#[test]
fn zero_threshold_detects_on_first_gazed_tick() {
    // Design mode: instant selection.
    let mut dwell = DwellTracker::new();
    assert!(dwell.update(true, 0.016, 0.0));
}

#[test]
fn zero_threshold_still_requires_a_hit() {
    let mut dwell = DwellTracker::new();
    assert!(!dwell.update(false, 0.016, 0.0));
}

#[test]
fn reset_clears_progress() {
    let mut dwell = DwellTracker::new();
    dwell.update(true, 0.5, 1.2);
    dwell.reset();
    assert_eq!(dwell.elapsed(), 0.0);
}
