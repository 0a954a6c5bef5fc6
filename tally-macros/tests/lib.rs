use crossbeam_channel::Receiver;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tally::prelude::*;
use tally::{Emission, MetricsEmitter, NopMetricSink, SpyMetricSink, WireFormat};
use tally_macros::{tally_decr, tally_incr, tally_record, tally_timing, tally_timing_raw};

/// Set a default emitter writing to a spy sink and return the channel
/// for inspecting the measurements written to it.
fn init_default_client() -> Receiver<Vec<u8>> {
    let (rx, sink) = SpyMetricSink::new();
    let client = MetricsEmitter::builder("my.prefix", sink)
        .with_format(WireFormat::Line)
        .build();

    tally_macros::set_global_default(client);
    rx
}

/// Get all the payloads written to the sink so far.
fn read_all_metrics(rx: &Receiver<Vec<u8>>) -> HashSet<String> {
    rx.try_iter().map(|v| String::from_utf8(v).unwrap()).collect()
}

#[test]
fn test_macros() {
    // NOTE: We're testing all the macros as part of a single #[test] block
    // because the global default can only be set once per process and test
    // functions are run in multiple threads by default.

    fn test_macros_before_default_is_set() {
        assert!(!tally_macros::is_global_default_set());
        assert!(tally_macros::get_global_default().is_none());
        assert!(!tally_macros::global_metrics().is_enabled());

        assert!(matches!(tally_incr!("some.counter"), Emission::Disabled));
        assert!(matches!(tally_decr!("some.counter", 3), Emission::Disabled));
        assert!(matches!(tally_timing!("some.timer", Instant::now()), Emission::Disabled));
        assert!(matches!(tally_timing_raw!("some.timer", 10, 0.5), Emission::Disabled));
        assert!(matches!(tally_record!("some.thing", "a" => 1i64), Emission::Disabled));
    }

    fn test_counter_macros(rx: &Receiver<Vec<u8>>) {
        tally_incr!("some.counter");
        tally_incr!("some.counter", 5);
        tally_decr!("other.counter");
        tally_decr!("other.counter", 7, 1.0);

        let metrics = read_all_metrics(rx);
        assert!(metrics.contains("my.prefix.some.counter value=1i"));
        assert!(metrics.contains("my.prefix.some.counter value=5i"));
        assert!(metrics.contains("my.prefix.other.counter value=-1i"));
        assert!(metrics.contains("my.prefix.other.counter value=-7i"));
    }

    fn test_timer_macros(rx: &Receiver<Vec<u8>>) {
        tally_timing_raw!("some.timer", 1500);
        let start = Instant::now() - Duration::from_millis(3);
        tally_timing!("other.timer", start);

        let metrics = read_all_metrics(rx);
        assert!(metrics.contains("my.prefix.some.timer microseconds=1500i"));
        assert!(metrics.iter().any(|m| m.starts_with("my.prefix.other.timer microseconds=")));
    }

    fn test_record_macros(rx: &Receiver<Vec<u8>>) {
        tally_record!("some.query", "rows" => 12i64, "load" => 0.5);
        tally_record!("some.query", rate = 1.0, "rows" => 13i64,);

        let metrics = read_all_metrics(rx);
        assert!(metrics.contains("my.prefix.some.query rows=12i,load=0.5"));
        assert!(metrics.contains("my.prefix.some.query rows=13i"));
    }

    fn test_sampled_macros(rx: &Receiver<Vec<u8>>) {
        assert!(matches!(tally_incr!("never.counter", 1, -0.5), Emission::Sampled));
        assert!(matches!(tally_timing_raw!("never.timer", 1, -1.0), Emission::Sampled));

        let metrics = read_all_metrics(rx);
        assert!(metrics.is_empty());
    }

    fn test_default_set_only_once() {
        tally_macros::set_global_default(MetricsEmitter::from_sink("replacement", NopMetricSink));

        let global = tally_macros::get_global_default().unwrap();
        assert_eq!(Some("my.prefix"), global.prefix());
        assert!(tally_macros::global_metrics().increment("some.counter", 1, 1.0).is_sent());
    }

    test_macros_before_default_is_set();

    let rx = init_default_client();
    assert!(tally_macros::is_global_default_set());

    test_counter_macros(&rx);
    test_timer_macros(&rx);
    test_record_macros(&rx);
    test_sampled_macros(&rx);
    test_default_set_only_once();
}
