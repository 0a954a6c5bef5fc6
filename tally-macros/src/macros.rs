// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// NOTE: Comments here are mostly just copy/pasted. Make sure to update all of
//  them if you make changes!

/// Increment a counter using the default global emitter, optionally with an
/// amount and a sample rate
///
/// The amount defaults to `1` and the sample rate to `1.0`. The counter will
/// use the prefix from the default global emitter combined with the provided
/// name.
///
/// Nothing happens if the default global emitter has not been set. Errors
/// are handled by the error handler of the default global emitter.
///
/// # Examples
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
/// use tally_macros::tally_incr;
///
/// tally_macros::set_global_default(MetricsEmitter::from_sink("my.prefix", NopMetricSink));
///
/// // "my.prefix.some.counter" value=1
/// tally_incr!("some.counter");
/// // "my.prefix.some.counter" value=5
/// tally_incr!("some.counter", 5);
/// // "my.prefix.some.counter" value=5, one time in ten
/// tally_incr!("some.counter", 5, 0.1);
/// ```
#[macro_export]
macro_rules! tally_incr {
    ($name:expr) => {
        $crate::tally_incr!($name, 1, 1.0)
    };

    ($name:expr, $amount:expr) => {
        $crate::tally_incr!($name, $amount, 1.0)
    };

    ($name:expr, $amount:expr, $rate:expr) => {
        $crate::_generate_impl!(Counted::increment, $name, $amount, $rate)
    };
}

/// Decrement a counter using the default global emitter, optionally with an
/// amount and a sample rate
///
/// The amount defaults to `1` and the sample rate to `1.0`. The counter will
/// use the prefix from the default global emitter combined with the provided
/// name.
///
/// Nothing happens if the default global emitter has not been set. Errors
/// are handled by the error handler of the default global emitter.
///
/// # Examples
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
/// use tally_macros::tally_decr;
///
/// tally_macros::set_global_default(MetricsEmitter::from_sink("my.prefix", NopMetricSink));
///
/// // "my.prefix.some.counter" value=-1
/// tally_decr!("some.counter");
/// // "my.prefix.some.counter" value=-5
/// tally_decr!("some.counter", 5);
/// // "my.prefix.some.counter" value=-5, one time in ten
/// tally_decr!("some.counter", 5, 0.1);
/// ```
#[macro_export]
macro_rules! tally_decr {
    ($name:expr) => {
        $crate::tally_decr!($name, 1, 1.0)
    };

    ($name:expr, $amount:expr) => {
        $crate::tally_decr!($name, $amount, 1.0)
    };

    ($name:expr, $amount:expr, $rate:expr) => {
        $crate::_generate_impl!(Counted::decrement, $name, $amount, $rate)
    };
}

/// Record the time elapsed since an `Instant` using the default global
/// emitter, optionally with a sample rate
///
/// The sample rate defaults to `1.0`. The timing is sent in microseconds and
/// will use the prefix from the default global emitter combined with the
/// provided name.
///
/// Nothing happens if the default global emitter has not been set. Errors
/// are handled by the error handler of the default global emitter.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use tally::{MetricsEmitter, NopMetricSink};
/// use tally_macros::tally_timing;
///
/// tally_macros::set_global_default(MetricsEmitter::from_sink("my.prefix", NopMetricSink));
///
/// let start = Instant::now();
/// // "my.prefix.some.timer" microseconds=...
/// tally_timing!("some.timer", start);
/// // "my.prefix.some.timer" microseconds=..., one time in ten
/// tally_timing!("some.timer", start, 0.1);
/// ```
#[macro_export]
macro_rules! tally_timing {
    ($name:expr, $start:expr) => {
        $crate::tally_timing!($name, $start, 1.0)
    };

    ($name:expr, $start:expr, $rate:expr) => {
        $crate::_generate_impl!(Timed::timing, $name, $start, $rate)
    };
}

/// Record a timing in microseconds using the default global emitter,
/// optionally with a sample rate
///
/// The sample rate defaults to `1.0`. The value is sent verbatim and will use
/// the prefix from the default global emitter combined with the provided name.
///
/// Nothing happens if the default global emitter has not been set. Errors
/// are handled by the error handler of the default global emitter.
///
/// # Examples
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
/// use tally_macros::tally_timing_raw;
///
/// tally_macros::set_global_default(MetricsEmitter::from_sink("my.prefix", NopMetricSink));
///
/// // "my.prefix.some.timer" microseconds=1500
/// tally_timing_raw!("some.timer", 1500);
/// // "my.prefix.some.timer" microseconds=1500, one time in ten
/// tally_timing_raw!("some.timer", 1500, 0.1);
/// ```
#[macro_export]
macro_rules! tally_timing_raw {
    ($name:expr, $micros:expr) => {
        $crate::tally_timing_raw!($name, $micros, 1.0)
    };

    ($name:expr, $micros:expr, $rate:expr) => {
        $crate::_generate_impl!(Timed::timing_raw, $name, $micros, $rate)
    };
}

/// Record a measurement with arbitrary fields using the default global
/// emitter, optionally with a sample rate
///
/// The sample rate defaults to `1.0` and is given as `rate = ...` before the
/// fields. Field values can be anything that converts into a
/// `tally::FieldValue`.
///
/// Nothing happens if the default global emitter has not been set. Errors
/// are handled by the error handler of the default global emitter.
///
/// # Examples
///
/// ```
/// use tally::{MetricsEmitter, NopMetricSink};
/// use tally_macros::tally_record;
///
/// tally_macros::set_global_default(MetricsEmitter::from_sink("my.prefix", NopMetricSink));
///
/// // "my.prefix.db.query" rows=12,microseconds=1500
/// tally_record!("db.query", "rows" => 12i64, "microseconds" => 1500i64);
/// // "my.prefix.db.query" load=0.75, one time in ten
/// tally_record!("db.query", rate = 0.1, "load" => 0.75);
/// ```
#[macro_export]
macro_rules! tally_record {
    ($name:expr, rate = $rate:expr, $($field:expr => $val:expr),+ $(,)?) => {{
        match $crate::get_global_default() {
            Some(client) => $crate::__private::MetricBackend::record(
                &*client,
                $name,
                &[$(($field, $crate::__private::FieldValue::from($val))),+],
                $rate,
            ),
            None => $crate::__private::Emission::Disabled,
        }
    }};

    ($name:expr, $($field:expr => $val:expr),+ $(,)?) => {
        $crate::tally_record!($name, rate = 1.0, $($field => $val),+)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _generate_impl {
    ($trait:ident :: $method:ident, $name:expr, $val:expr, $rate:expr) => {{
        match $crate::get_global_default() {
            Some(client) => $crate::__private::$trait::$method(&*client, $name, $val, $rate),
            None => $crate::__private::Emission::Disabled,
        }
    }};
}
