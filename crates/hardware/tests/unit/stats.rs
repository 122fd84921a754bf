//! Timing counters.

use iss_core::stats::{Timing, TimingTracker};
use pretty_assertions::assert_eq;

#[test]
fn counters_accumulate() {
    let mut timing = Timing::new();
    timing.charge_load_latency(3);
    timing.charge_load_latency(4);
    timing.charge_misaligned_event(1);
    timing.charge_load_event(1);
    timing.advance_cycle();
    timing.advance_cycle();

    assert_eq!(
        timing,
        Timing {
            stall_cycles: 7,
            load_events: 1,
            misaligned_events: 1,
            cycles: 2,
        }
    );
}

#[test]
fn json_report() {
    let timing = Timing {
        stall_cycles: 5,
        load_events: 2,
        misaligned_events: 2,
        cycles: 9,
    };
    let json = timing.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "stall_cycles": 5,
            "load_events": 2,
            "misaligned_events": 2,
            "cycles": 9,
        })
    );
}
