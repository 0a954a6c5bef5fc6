use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tally::prelude::*;
use tally::{MetricsEmitter, Metrics};

pub const NUM_THREADS: u64 = 100;
pub const NUM_ITERATIONS: u64 = 1_000;

#[allow(dead_code)]
pub fn run_arc_threaded_test(client: MetricsEmitter, num_threads: u64, iterations: u64) {
    let shared = Metrics::from(client);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local = shared.clone();

            thread::spawn(move || {
                for i in 0..iterations {
                    assert!(!local.increment("some.counter", i as i64, 1.0).is_failed());
                    assert!(!local.decrement("some.counter", i as i64, 1.0).is_failed());
                    assert!(!local.timing_raw("some.timer", i as i64, 1.0).is_failed());
                    assert!(!local.increment("some.sampled", 1, 0.5).is_failed());
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }
}
