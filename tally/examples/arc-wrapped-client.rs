// Tally - A sampling InfluxDB metrics client for Rust!
//
// To the extent possible under law, the author(s) have dedicated all copyright and
// related and neighboring rights to this file to the public domain worldwide.
// This software is distributed without any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication along with this
// software. If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

// This example shows how you might use the Tally emitter in your multithreaded
// application by wrapping it in a `Metrics` handle. The handle can be cloned
// cheaply and shared between threads, and can be disabled entirely when the
// application runs without metrics.

use std::thread;
use tally::prelude::*;
use tally::{Metrics, MetricsEmitter, NopMetricSink};

pub trait RequestHandler {
    fn handle(&self) -> Result<(), String>;
}

pub struct ThreadedHandler {
    metrics: Metrics,
}

impl ThreadedHandler {
    fn new(metrics: Metrics) -> ThreadedHandler {
        ThreadedHandler { metrics }
    }
}

impl RequestHandler for ThreadedHandler {
    fn handle(&self) -> Result<(), String> {
        let metrics_ref = self.metrics.clone();

        let t = thread::spawn(move || {
            metrics_ref.increment("request.handled", 1, 1.0);
            println!("Hello from a threaded handler!");
        });

        t.join().unwrap();
        Ok(())
    }
}

fn main() {
    let enabled = ThreadedHandler::new(Metrics::from(MetricsEmitter::from_sink("example.prefix", NopMetricSink)));
    enabled.handle().unwrap();

    let disabled = ThreadedHandler::new(Metrics::Disabled);
    disabled.handle().unwrap();
}
