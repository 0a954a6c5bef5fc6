// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A sampling InfluxDB metrics client for Rust!
//!
//! Tally sends counters and timings from your application to InfluxDB over
//! UDP, one measurement per datagram, with optional client-side sampling.
//!
//! ## Features
//!
//! * Counters and timings, plus arbitrary multi-field measurements.
//! * Fire-and-forget UDP delivery: recording a metric never blocks on the
//!   network and never returns an error to the caller.
//! * Per-call sample rates to reduce the volume of high-frequency events.
//! * JSON series or line protocol payloads.
//! * Support for alternate backends via the `MetricSink` trait.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Create an emitter from an `influxdb://` URI. The database in the URI path
//! is used as a prefix for all measurement names.
//!
//! ```rust,no_run
//! use tally::prelude::*;
//! use tally::MetricsEmitter;
//!
//! // Note that you'll probably want to actually handle any errors creating
//! // the emitter when you use it for real in your application.
//! let client = MetricsEmitter::from_url("influxdb://user:pw@metrics.example.com:4444/myapp").unwrap();
//!
//! // Sent as "myapp.requests" with a field "value" = 1
//! client.increment("requests", 1, 1.0);
//! // Only sent for about one call in ten
//! client.timing_raw("db.query", 1500, 0.1);
//! ```
//!
//! ### Custom Use
//!
//! The builder allows changing the prefix, the wire format, the error
//! handler and the random number generator used for sampling.
//!
//! ```rust
//! use tally::prelude::*;
//! use tally::{MetricError, MetricsEmitter, NopMetricSink, WireFormat};
//!
//! let client = MetricsEmitter::builder("myapp", NopMetricSink)
//!     .with_format(WireFormat::Line)
//!     .with_error_handler(|err: &MetricError| eprintln!("metric error: {}", err))
//!     .build();
//!
//! client.decrement("queue.depth", 3, 1.0);
//! ```
//!
//! ### Optional Metrics
//!
//! Code that should be able to run with or without metrics can hold a
//! `Metrics` handle instead of an emitter. `Metrics::Disabled` turns every
//! call into a no-op.
//!
//! ```rust
//! use std::time::Instant;
//! use tally::prelude::*;
//! use tally::Metrics;
//!
//! fn handle_request(metrics: &Metrics) {
//!     let start = Instant::now();
//!     // ...
//!     metrics.timing("request", start, 1.0);
//! }
//!
//! handle_request(&Metrics::Disabled);
//! ```
//!

#![forbid(unsafe_code)]

pub use self::client::{
    elapsed_micros, elapsed_millis, Counted, Emission, MetricBackend, MetricClient, Metrics, MetricsEmitter,
    MetricsEmitterBuilder, Timed, MICROSECONDS_FIELD, VALUE_FIELD,
};

pub use self::endpoint::{Endpoint, DEFAULT_PORT, SCHEME};

pub use self::format::WireFormat;

pub use self::measurement::{FieldValue, Measurement};

pub use self::sinks::{MetricSink, NopMetricSink, SinkStats, SpyMetricSink, UdpMetricSink};

pub use self::types::{ConfigError, ErrorKind, MetricError, MetricResult};

mod client;
mod endpoint;
mod format;
mod measurement;
pub mod prelude;
mod sampler;
mod sinks;
mod types;
