// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::endpoint::Endpoint;
use crate::format::WireFormat;
use crate::measurement::{FieldValue, Measurement};
use crate::sampler::Sampler;
use crate::sinks::{MetricSink, SinkStats, UdpMetricSink};
use crate::types::{MetricError, MetricResult};
use rand::RngCore;
use std::fmt;
use std::panic::RefUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Field name used by counters (`increment` and `decrement`).
pub const VALUE_FIELD: &str = "value";

/// Field name used by timings (`timing` and `timing_raw`).
pub const MICROSECONDS_FIELD: &str = "microseconds";

/// Outcome of a best-effort attempt to record a metric.
///
/// Recording a metric never fails from the point of view of the caller:
/// errors are logged and handed to the error handler of the emitter. This
/// type exists so that callers who care (in tests, or to keep metrics about
/// metrics) can still see what happened. Ignoring it is always fine.
#[derive(Debug)]
pub enum Emission {
    /// The measurement was handed to the sink, which reported writing this
    /// many bytes.
    Sent(usize),
    /// The measurement was dropped by sampling and never reached the sink.
    Sampled,
    /// No emitter is configured, nothing happened.
    Disabled,
    /// The measurement could not be built, encoded or sent. The error has
    /// already been logged and passed to the error handler.
    Failed(MetricError),
}

impl Emission {
    pub fn is_sent(&self) -> bool {
        matches!(self, Emission::Sent(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Emission::Failed(_))
    }

    pub fn error(&self) -> Option<&MetricError> {
        match self {
            Emission::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Trait for recording arbitrary measurements.
///
/// This is the single operation every other way of emitting metrics is
/// built on. Implementations must never panic or return an error to the
/// caller because of a problem sending a metric.
pub trait MetricBackend {
    /// Record a measurement made of the given fields, subject to sampling.
    ///
    /// With a sample rate of 1.0 or more the measurement is always sent. With
    /// a lower rate, a uniform value in [0, 1) is drawn and the measurement is
    /// dropped when it is greater than the rate.
    fn record(&self, name: &str, fields: &[(&str, FieldValue)], sample_rate: f32) -> Emission;
}

/// Trait for incrementing and decrementing counters.
///
/// Counters are sent as a measurement with a single `value` field holding
/// the (possibly negative) amount.
pub trait Counted: MetricBackend {
    /// Record a counter with a `value` field of `amount`.
    fn increment(&self, name: &str, amount: i64, sample_rate: f32) -> Emission {
        self.record(name, &[(VALUE_FIELD, FieldValue::Integer(amount))], sample_rate)
    }

    /// Record a counter with a `value` field of `-amount`.
    fn decrement(&self, name: &str, amount: i64, sample_rate: f32) -> Emission {
        self.record(name, &[(VALUE_FIELD, FieldValue::Integer(amount.wrapping_neg()))], sample_rate)
    }
}

/// Trait for recording timings.
///
/// Timings are sent as a measurement with a single `microseconds` field.
pub trait Timed: MetricBackend {
    /// Record the time elapsed since `start`, truncated to microseconds.
    fn timing(&self, name: &str, start: Instant, sample_rate: f32) -> Emission {
        self.timing_raw(name, elapsed_micros(start), sample_rate)
    }

    /// Record a timing already expressed in microseconds, verbatim.
    fn timing_raw(&self, name: &str, micros: i64, sample_rate: f32) -> Emission {
        self.record(name, &[(MICROSECONDS_FIELD, FieldValue::Integer(micros))], sample_rate)
    }
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use `MetricsEmitter` with a generic type or place a
/// `MetricsEmitter` instance behind a pointer (such as a `Box`) this will
/// allow you to reference all the implemented methods for recording metrics.
///
/// ```
/// use tally::prelude::*;
/// use tally::{MetricsEmitter, NopMetricSink};
///
/// let client: Box<dyn MetricClient> = Box::new(MetricsEmitter::from_sink("prefix", NopMetricSink));
///
/// client.increment("some.counter", 1, 1.0);
/// client.timing_raw("some.timer", 42, 0.1);
/// ```
pub trait MetricClient: Counted + Timed {}

/// Microseconds elapsed since `start`, truncated.
pub fn elapsed_micros(start: Instant) -> i64 {
    i64::try_from(start.elapsed().as_micros()).unwrap_or(i64::MAX)
}

/// Milliseconds elapsed since `start`, truncated.
pub fn elapsed_millis(start: Instant) -> i64 {
    i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX)
}

/// Builder for creating and customizing `MetricsEmitter` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// or `::builder_for()` methods on the `MetricsEmitter` struct.
///
/// # Example
///
/// ```
/// use tally::prelude::*;
/// use tally::{MetricError, MetricsEmitter, NopMetricSink, WireFormat};
///
/// fn my_error_handler(err: &MetricError) {
///     println!("Metric error! {}", err);
/// }
///
/// let client = MetricsEmitter::builder("prefix", NopMetricSink)
///     .with_error_handler(my_error_handler)
///     .with_format(WireFormat::Line)
///     .build();
///
/// client.increment("something", 123, 1.0);
/// ```
pub struct MetricsEmitterBuilder {
    prefix: String,
    format: WireFormat,
    sampler: Sampler,
    sink: Box<dyn MetricSink + Sync + Send + RefUnwindSafe>,
    errors: Box<dyn Fn(&MetricError) + Sync + Send + RefUnwindSafe>,
}

impl MetricsEmitterBuilder {
    // Set the required fields and defaults for optional fields
    fn new<T>(prefix: &str, sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        MetricsEmitterBuilder {
            // required
            prefix: Self::formatted_prefix(prefix),
            sink: Box::new(sink),

            // optional with defaults
            format: WireFormat::default(),
            sampler: Sampler::default(),
            errors: Box::new(log_error_handler),
        }
    }

    /// Prepend `prefix` and a `.` to the name of every measurement.
    ///
    /// A trailing `.` on the prefix is not doubled. An empty prefix turns
    /// prefixing off.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Self::formatted_prefix(prefix);
        self
    }

    /// Send measurement names exactly as given.
    pub fn without_prefix(mut self) -> Self {
        self.prefix = String::new();
        self
    }

    /// Set the encoding used for each datagram, `WireFormat::Series` by default.
    pub fn with_format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    /// Use the given random number generator for sampling decisions instead
    /// of the thread-local generator.
    ///
    /// This is mostly useful to get deterministic sampling in tests by way of
    /// a seeded generator. The generator is shared by all threads using the
    /// emitter and guarded by a mutex.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.sampler = Sampler::seeded(rng);
        self
    }

    /// Set an error handler to use when a metric can't be sent.
    ///
    /// The error handler is only invoked when metrics are not able to be sent
    /// correctly. Either due to invalid input, I/O errors encountered when trying
    /// to send them via a `MetricSink`, or a failure to encode them.
    ///
    /// The default handler logs the error at the `error` level via `tracing`.
    /// The handler should consume the error without panicking.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(&MetricError) + Sync + Send + RefUnwindSafe + 'static,
    {
        self.errors = Box::new(errors);
        self
    }

    /// Construct a new `MetricsEmitter` instance based on current settings.
    pub fn build(self) -> MetricsEmitter {
        MetricsEmitter::from_builder(self)
    }

    fn formatted_prefix(prefix: &str) -> String {
        let trimmed = prefix.trim_end_matches('.');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}.", trimmed)
        }
    }
}

/// Client for InfluxDB that implements various traits to record metrics.
///
/// # Traits
///
/// * `MetricBackend` for recording arbitrary measurements.
/// * `Counted` for incrementing and decrementing counters.
/// * `Timed` for recording timings.
/// * `MetricClient` for a combination of all of the above.
///
/// # Errors
///
/// Recording a metric never returns an error to the caller. Failures are
/// logged, handed to the error handler, and reported in the returned
/// `Emission` which callers are free to ignore. The only fallible part of
/// using an emitter is creating it.
///
/// # Threading
///
/// The `MetricsEmitter` is `Send` and `Sync`. Wrap it in an `Arc` (or use
/// `Metrics`, which does so) to share it between threads.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use tally::prelude::*;
/// use tally::MetricsEmitter;
///
/// let client = Arc::new(MetricsEmitter::from_url("influxdb://localhost:4444/myapp").unwrap());
/// let local = Arc::clone(&client);
///
/// thread::spawn(move || {
///     local.increment("request.handler", 1, 1.0);
/// });
/// ```
pub struct MetricsEmitter {
    prefix: String,
    format: WireFormat,
    sampler: Sampler,
    sink: Box<dyn MetricSink + Sync + Send + RefUnwindSafe>,
    errors: Box<dyn Fn(&MetricError) + Sync + Send + RefUnwindSafe>,
}

impl MetricsEmitter {
    /// Create a new emitter that will use the given prefix for all
    /// measurements sent to the given `MetricSink` implementation.
    ///
    /// An empty prefix means measurement names are sent unchanged.
    ///
    /// ```
    /// use tally::{MetricsEmitter, NopMetricSink};
    ///
    /// let client = MetricsEmitter::from_sink("myapp", NopMetricSink);
    /// assert_eq!(Some("myapp"), client.prefix());
    /// ```
    pub fn from_sink<T>(prefix: &str, sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        Self::builder(prefix, sink).build()
    }

    /// Create a new builder with the provided prefix and metric sink.
    ///
    /// General defaults:
    ///
    /// * Measurements are encoded as JSON series (`WireFormat::Series`).
    /// * Sampling uses the thread-local random number generator.
    /// * Errors sending metrics are logged via `tracing`.
    pub fn builder<T>(prefix: &str, sink: T) -> MetricsEmitterBuilder
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        MetricsEmitterBuilder::new(prefix, sink)
    }

    /// Create a new builder sending to the host of `endpoint` over UDP and
    /// using its database as the prefix.
    ///
    /// # Failures
    ///
    /// This method fails if the host can't be resolved or a local UDP socket
    /// can't be bound.
    pub fn builder_for(endpoint: &Endpoint) -> MetricResult<MetricsEmitterBuilder> {
        let sink = UdpMetricSink::open(endpoint)?;
        Ok(Self::builder(endpoint.database(), sink))
    }

    /// Create a new emitter sending to the host of `endpoint` over UDP and
    /// using its database as the prefix.
    pub fn from_endpoint(endpoint: &Endpoint) -> MetricResult<Self> {
        Ok(Self::builder_for(endpoint)?.build())
    }

    /// Parse an `influxdb://` URI and create a new emitter for it.
    ///
    /// # Failures
    ///
    /// This method fails if the URI is invalid, uses the wrong scheme, the
    /// host can't be resolved or a local UDP socket can't be bound.
    pub fn from_url(uri: &str) -> MetricResult<Self> {
        let endpoint = Endpoint::parse(uri)?;
        Self::from_endpoint(&endpoint)
    }

    /// Prefix applied to measurement names, without the trailing `.`.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.strip_suffix('.')
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// I/O counters of the underlying sink.
    pub fn stats(&self) -> SinkStats {
        self.sink.stats()
    }

    // Create a new MetricsEmitter by consuming the builder
    fn from_builder(builder: MetricsEmitterBuilder) -> Self {
        MetricsEmitter {
            prefix: builder.prefix,
            format: builder.format,
            sampler: builder.sampler,
            sink: builder.sink,
            errors: builder.errors,
        }
    }

    fn send(&self, name: &str, fields: &[(&str, FieldValue)]) -> MetricResult<usize> {
        let measurement = Measurement::new(format!("{}{}", self.prefix, name), fields)?;
        let payload = self.format.encode(&measurement)?;
        Ok(self.sink.emit(&payload)?)
    }
}

impl MetricBackend for MetricsEmitter {
    fn record(&self, name: &str, fields: &[(&str, FieldValue)], sample_rate: f32) -> Emission {
        if !self.sampler.keep(sample_rate) {
            return Emission::Sampled;
        }

        match self.send(name, fields) {
            Ok(written) => Emission::Sent(written),
            Err(err) => {
                (self.errors)(&err);
                Emission::Failed(err)
            }
        }
    }
}

impl Counted for MetricsEmitter {}

impl Timed for MetricsEmitter {}

impl MetricClient for MetricsEmitter {}

impl fmt::Debug for MetricsEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetricsEmitter {{ prefix: {:?}, format: {:?}, sampler: {:?}, sink: ..., errors: ... }}",
            self.prefix, self.format, self.sampler,
        )
    }
}

/// Handle for recording metrics that may or may not be backed by an emitter.
///
/// Code that is instrumented before metrics are wired up (or in tests that
/// don't care about metrics) can hold a `Metrics::Disabled` and record
/// unconditionally: every call is a silent no-op that returns
/// `Emission::Disabled`.
///
/// ```
/// use tally::prelude::*;
/// use tally::{Emission, Metrics, MetricsEmitter, NopMetricSink};
///
/// let disabled = Metrics::Disabled;
/// assert!(matches!(disabled.increment("requests", 1, 1.0), Emission::Disabled));
///
/// let enabled = Metrics::from(MetricsEmitter::from_sink("myapp", NopMetricSink));
/// assert!(enabled.increment("requests", 1, 1.0).is_sent());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Metrics {
    Configured(Arc<MetricsEmitter>),
    #[default]
    Disabled,
}

impl Metrics {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Metrics::Configured(_))
    }

    pub fn emitter(&self) -> Option<&Arc<MetricsEmitter>> {
        match self {
            Metrics::Configured(emitter) => Some(emitter),
            Metrics::Disabled => None,
        }
    }
}

impl From<MetricsEmitter> for Metrics {
    fn from(emitter: MetricsEmitter) -> Self {
        Metrics::Configured(Arc::new(emitter))
    }
}

impl From<Arc<MetricsEmitter>> for Metrics {
    fn from(emitter: Arc<MetricsEmitter>) -> Self {
        Metrics::Configured(emitter)
    }
}

impl From<Option<Arc<MetricsEmitter>>> for Metrics {
    fn from(emitter: Option<Arc<MetricsEmitter>>) -> Self {
        emitter.map_or(Metrics::Disabled, Metrics::Configured)
    }
}

impl MetricBackend for Metrics {
    fn record(&self, name: &str, fields: &[(&str, FieldValue)], sample_rate: f32) -> Emission {
        match self {
            Metrics::Configured(emitter) => emitter.record(name, fields, sample_rate),
            Metrics::Disabled => Emission::Disabled,
        }
    }
}

impl Counted for Metrics {}

impl Timed for Metrics {}

impl MetricClient for Metrics {}

fn log_error_handler(err: &MetricError) {
    error!("Failed to write measurement to influxdb: {}", err);
}
