// Tally - A sampling InfluxDB metrics client for Rust!
//
// To the extent possible under law, the author(s) have dedicated all copyright and
// related and neighboring rights to this file to the public domain worldwide.
// This software is distributed without any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication along with this
// software. If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

// This example shows how you might make use of the "Spy" sink in Tally which
// is meant for integration testing your application. It hands callers the
// receiving end of a channel that every payload is written to, which can be
// used to verify that Tally wrote what you thought it was going to write.

use tally::prelude::*;
use tally::{MetricsEmitter, SpyMetricSink, WireFormat};

fn main() {
    let (rx, sink) = SpyMetricSink::new();
    let metrics = MetricsEmitter::builder("example.prefix", sink)
        .with_format(WireFormat::Line)
        .build();

    metrics.increment("example.counter", 1, 1.0);
    metrics.timing_raw("example.timer", 32, 1.0);
    metrics.record("example.query", &[("rows", 12i64.into()), ("load", 0.75.into())], 1.0);

    for payload in rx.try_iter() {
        println!("Written to spy sink: {}", String::from_utf8_lossy(&payload));
    }
}
