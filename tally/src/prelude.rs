// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of Tally for ease of use.
//!
//! This module exports all traits required for recording metrics so that
//! `MetricsEmitter` and `Metrics` methods can be called directly.

pub use crate::client::{Counted, MetricBackend, MetricClient, Timed};
