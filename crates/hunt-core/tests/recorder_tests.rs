mod common;

use common::FakeMic;
use hunt_core::{Memo, MemoRecorder, Microphone, MAX_MEMO_SAMPLES, MEMO_SAMPLE_RATE};

#[test]
fn stop_while_idle_is_a_no_op() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    assert!(rec.stop(&mut mic).is_none());
    assert!(!rec.is_recording());
}

#[test]
fn double_start_behaves_like_one() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    mic.feed_constant(0.5, 100);
    rec.pump(&mut mic);
    assert_eq!(rec.written(), 100);
    // Second start while recording must not rewind or duplicate anything.
    rec.start(&mut mic);
    assert_eq!(rec.written(), 100);
    assert!(rec.is_recording());
}

#[test]
fn start_after_stop_rewinds_the_cursor() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    mic.feed_constant(0.5, 100);
    rec.pump(&mut mic);
    let memo = rec.stop(&mut mic).expect("capture should finalize");
    assert_eq!(memo.samples().len(), 100);

    rec.start(&mut mic);
    assert_eq!(rec.written(), 0);
}

#[test]
fn stop_trims_to_written_length() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    mic.feed_constant(0.25, 4_800); // 0.1s
    rec.pump(&mut mic);
    let memo = rec.stop(&mut mic).expect("capture should finalize");
    assert_eq!(memo.samples().len(), 4_800);
    assert!((memo.duration_secs() - 0.1).abs() < 1e-4);
    assert!(!mic.is_recording(), "stop must release the mic");
}

#[test]
fn overflow_finalizes_exactly_at_capacity() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    // Keep feeding past the 5s capacity; the recorder must auto-stop with
    // a memo of exactly the maximum length, never longer.
    let chunk = vec![0.1_f32; MEMO_SAMPLE_RATE as usize];
    let mut finalized = None;
    for _ in 0..7 {
        mic.feed(&chunk);
        if let Some(memo) = rec.pump(&mut mic) {
            finalized = Some(memo);
            break;
        }
    }
    let memo = finalized.expect("overflow should finalize the memo");
    assert_eq!(memo.samples().len(), MAX_MEMO_SAMPLES);
    assert!(!rec.is_recording());
    assert!(!mic.is_recording());
}

#[test]
fn pump_retries_through_stalled_reads() {
    // The capture source reports unread samples but the first reads come
    // back empty; the bounded retry loop must still drain them this tick.
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    mic.feed_constant(0.3, 1_000);
    mic.stall_reads = 3;
    rec.pump(&mut mic);
    assert_eq!(rec.written(), 1_000);
    assert_eq!(mic.unread_samples(), 0);
}

#[test]
fn pump_while_idle_reads_nothing() {
    let mut mic = FakeMic::new();
    mic.start();
    mic.feed_constant(0.3, 500);
    let mut rec = MemoRecorder::new();
    assert!(rec.pump(&mut mic).is_none());
    assert_eq!(rec.written(), 0);
    assert_eq!(mic.unread_samples(), 500);
}

#[test]
fn discard_drops_partial_capture() {
    let mut mic = FakeMic::new();
    let mut rec = MemoRecorder::new();
    rec.start(&mut mic);
    mic.feed_constant(0.5, 200);
    rec.pump(&mut mic);
    rec.discard(&mut mic);
    assert!(!rec.is_recording());
    assert!(!mic.is_recording());
    assert_eq!(rec.written(), 0);
}

#[test]
fn memo_byte_round_trip() {
    let samples = vec![0.0_f32, 0.5, -0.5, 1.0, -1.0];
    let memo = Memo::new(samples.clone(), MEMO_SAMPLE_RATE);
    let decoded = Memo::from_bytes(&memo.to_bytes());
    assert_eq!(decoded.samples(), samples.as_slice());
    assert_eq!(decoded.sample_rate(), MEMO_SAMPLE_RATE);
}
