use std::time::Instant;
use tally::prelude::*;
use tally::{Emission, FieldValue, Metrics, MetricsEmitter, NopMetricSink};
use utils::{run_arc_threaded_test, NUM_ITERATIONS, NUM_THREADS};

mod utils;

fn new_nop_client(prefix: &str) -> MetricsEmitter {
    MetricsEmitter::from_sink(prefix, NopMetricSink)
}

#[test]
fn test_metrics_emitter_increment() {
    let client = new_nop_client("client.test");
    assert!(client.increment("counter.key", 42, 1.0).is_sent());
}

#[test]
fn test_metrics_emitter_decrement() {
    let client = new_nop_client("client.test");
    assert!(client.decrement("counter.key", 42, 1.0).is_sent());
}

#[test]
fn test_metrics_emitter_timing() {
    let client = new_nop_client("client.test");
    assert!(client.timing("timer.key", Instant::now(), 1.0).is_sent());
}

#[test]
fn test_metrics_emitter_timing_raw() {
    let client = new_nop_client("client.test");
    assert!(client.timing_raw("timer.key", 25, 1.0).is_sent());
}

#[test]
fn test_metrics_emitter_record() {
    let client = new_nop_client("client.test");
    let res = client.record(
        "request",
        &[("bytes", FieldValue::from(512i64)), ("load", FieldValue::from(0.5))],
        1.0,
    );
    assert!(res.is_sent());
}

#[test]
fn test_metrics_emitter_record_sampled_out() {
    let client = new_nop_client("client.test");
    assert!(matches!(client.increment("counter.key", 1, 0.0), Emission::Sampled));
}

#[test]
fn test_metrics_disabled_record() {
    let metrics = Metrics::Disabled;
    assert!(matches!(metrics.increment("counter.key", 1, 1.0), Emission::Disabled));
}

#[test]
fn test_metrics_emitter_nop_sink_single_threaded() {
    let client = new_nop_client("tally");
    run_arc_threaded_test(client, 1, 1);
}

#[ignore]
#[test]
fn test_metrics_emitter_nop_sink_many_threaded() {
    let client = new_nop_client("tally");
    run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);
}
