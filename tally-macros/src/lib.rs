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
//! The `tally-macros` crate provides a process-wide default `MetricsEmitter`
//! and macros that record metrics with it, so that deeply nested code can be
//! instrumented without passing an emitter around.
//!
//! ## Usage
//!
//! Configure a `tally::MetricsEmitter` as usual during startup and use the
//! `set_global_default` function to set it as the default. After that, you
//! can make use of the macros in this crate anywhere.
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use tally::MetricsEmitter;
//! use tally_macros::{tally_decr, tally_incr, tally_record, tally_timing, tally_timing_raw};
//!
//! let client = MetricsEmitter::from_url("influxdb://metrics.example.com:4444/myapp").unwrap();
//!
//! // Set the default emitter to use for macro calls
//! tally_macros::set_global_default(client);
//!
//! // Macros!
//! let start = Instant::now();
//!
//! tally_incr!("some.counter");
//! tally_incr!("some.counter", 5);
//! tally_incr!("some.counter", 5, 0.5);
//!
//! tally_decr!("some.counter");
//! tally_decr!("some.counter", 5, 0.5);
//!
//! tally_timing!("some.timer", start);
//! tally_timing_raw!("some.timer", 1500, 0.1);
//!
//! tally_record!("some.measurement", "rows" => 12i64, "load" => 0.5);
//! ```
//!
//! ## Before Startup
//!
//! Unlike calling methods on an emitter directly, the macros are safe to use
//! before a default emitter has been set: until then every call is a silent
//! no-op that returns `tally::Emission::Disabled`. This lets instrumentation
//! be added to code paths (and run in tests) before metrics are wired up.
//!
//! ## Limitations
//!
//! * The default emitter can only be set once. Later calls to
//!   `set_global_default` are ignored.
//!

pub use crate::state::{get_global_default, global_metrics, is_global_default_set, set_global_default};

mod macros;
mod state;

// Used by the macros, not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use tally::{Counted, Emission, FieldValue, MetricBackend, Timed};
}
