// Tally - A sampling InfluxDB metrics client for Rust!
//
// To the extent possible under law, the author(s) have dedicated all copyright and
// related and neighboring rights to this file to the public domain worldwide.
// This software is distributed without any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication along with this
// software. If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

// This example shows using a very simple UDP sink. Every metric is sent as its
// own datagram from the calling thread, with the database from the URI used as
// the prefix of every measurement name.

use std::net::UdpSocket;
use std::time::Instant;
use tally::prelude::*;
use tally::{MetricsEmitter, UdpMetricSink, WireFormat, DEFAULT_PORT};

fn main() {
    let metrics = MetricsEmitter::from_url("influxdb://localhost:4444/example").unwrap();
    let start = Instant::now();

    metrics.increment("example.counter", 1, 1.0);
    metrics.decrement("example.counter", 3, 1.0);
    metrics.timing_raw("example.timer", 1500, 0.5);
    metrics.timing("example.timer", start, 1.0);

    // The sink can also be built by hand when the URI form doesn't fit
    let sock = UdpSocket::bind("0.0.0.0:0").unwrap();
    let sink = UdpMetricSink::from(("localhost", DEFAULT_PORT), sock).unwrap();
    let metrics = MetricsEmitter::builder("example.prefix", sink)
        .with_format(WireFormat::Line)
        .build();

    metrics.increment("example.counter", 1, 1.0);
}
