// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::{Arc, OnceLock};
use tally::{Metrics, MetricsEmitter};
use tracing::debug;

/// Global default MetricsEmitter to be used by macros
static HOLDER: OnceLock<Arc<MetricsEmitter>> = OnceLock::new();

/// Set the global default `MetricsEmitter` instance
///
/// Only the first call has any effect: if the global default emitter has
/// already been set, the new emitter is dropped and the existing one is
/// kept. Set it once, during startup, before any metrics are recorded.
///
/// # Example
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
/// let client = MetricsEmitter::from_sink("my.prefix", NopMetricSink);
///
/// tally_macros::set_global_default(client);
/// ```
pub fn set_global_default(emitter: MetricsEmitter) {
    if HOLDER.set(Arc::new(emitter)).is_err() {
        debug!("Global default MetricsEmitter already set, ignoring new instance");
    }
}

/// Get a reference to the global default `MetricsEmitter` instance, or
/// `None` if it has not been set.
///
/// # Example
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
///
/// let global_client = tally_macros::get_global_default();
/// assert!(global_client.is_none());
///
/// let client = MetricsEmitter::from_sink("my.prefix", NopMetricSink);
/// tally_macros::set_global_default(client);
///
/// let global_client = tally_macros::get_global_default();
/// assert!(global_client.is_some());
/// ```
pub fn get_global_default() -> Option<Arc<MetricsEmitter>> {
    HOLDER.get().cloned()
}

/// Return true if the global default `MetricsEmitter` is set, false otherwise
///
/// # Example
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
///
/// assert!(!tally_macros::is_global_default_set());
///
/// let client = MetricsEmitter::from_sink("my.prefix", NopMetricSink);
/// tally_macros::set_global_default(client);
///
/// assert!(tally_macros::is_global_default_set());
/// ```
pub fn is_global_default_set() -> bool {
    HOLDER.get().is_some()
}

/// Get a `Metrics` handle for the global default `MetricsEmitter`.
///
/// The handle is `Metrics::Disabled` while the global default is not set,
/// so metrics recorded through it before startup has finished are silently
/// discarded.
///
/// # Example
///
/// ```
/// use tally::prelude::*;
/// use tally::Emission;
///
/// let metrics = tally_macros::global_metrics();
/// assert!(matches!(metrics.increment("some.counter", 1, 1.0), Emission::Disabled));
/// ```
pub fn global_metrics() -> Metrics {
    Metrics::from(get_global_default())
}
