// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::measurement::{FieldValue, Measurement};
use crate::types::MetricResult;
use serde::Serialize;
use std::fmt::Write;

/// Encoding used for the payload of each datagram sent to InfluxDB.
///
/// ## Series
///
/// The JSON series format accepted by the UDP input of InfluxDB 0.8 and
/// earlier. Each datagram holds a single series with a single point.
///
/// ``` text
/// [{"name":"myapp.requests","columns":["value"],"points":[[1]]}]
/// ```
///
/// ## Line
///
/// The line protocol used by the UDP input of InfluxDB 0.9 and later.
///
/// ``` text
/// myapp.requests value=1i
/// ```
///
/// In both cases the timestamp is left out and assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Series,
    Line,
}

#[derive(Serialize)]
struct Series<'a> {
    name: &'a str,
    columns: Vec<&'a str>,
    points: [Vec<FieldValue>; 1],
}

impl WireFormat {
    /// Encode a measurement as the payload of a single datagram.
    pub fn encode(&self, measurement: &Measurement) -> MetricResult<String> {
        match self {
            WireFormat::Series => encode_series(measurement),
            WireFormat::Line => Ok(encode_line(measurement)),
        }
    }
}

fn encode_series(measurement: &Measurement) -> MetricResult<String> {
    let series = Series {
        name: measurement.name(),
        columns: measurement.columns().collect(),
        points: [measurement.values().collect()],
    };

    Ok(serde_json::to_string(&[series])?)
}

fn encode_line(measurement: &Measurement) -> String {
    let mut out = String::with_capacity(measurement.name().len() + 16 * measurement.fields().len());
    escape_into(&mut out, measurement.name(), &[',', ' ']);

    for (i, (key, value)) in measurement.fields().iter().enumerate() {
        out.push(if i == 0 { ' ' } else { ',' });
        escape_into(&mut out, key, &[',', '=', ' ']);
        out.push('=');

        // writing to a String can't fail
        let _ = match value {
            FieldValue::Integer(v) => write!(out, "{}i", v),
            FieldValue::Float(v) => write!(out, "{}", v),
        };
    }

    out
}

fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::WireFormat;
    use crate::measurement::{FieldValue, Measurement};

    #[test]
    fn test_default_format_is_series() {
        assert_eq!(WireFormat::Series, WireFormat::default());
    }

    #[test]
    fn test_encode_series_single_field() {
        let m = Measurement::new("myapp.requests", &[("value", FieldValue::from(5i64))]).unwrap();

        assert_eq!(
            r#"[{"name":"myapp.requests","columns":["value"],"points":[[5]]}]"#,
            WireFormat::Series.encode(&m).unwrap()
        );
    }

    #[test]
    fn test_encode_series_multiple_fields() {
        let m = Measurement::new(
            "db.query",
            &[("microseconds", FieldValue::from(1500i64)), ("rows", FieldValue::from(2.5))],
        )
        .unwrap();

        assert_eq!(
            r#"[{"name":"db.query","columns":["microseconds","rows"],"points":[[1500,2.5]]}]"#,
            WireFormat::Series.encode(&m).unwrap()
        );
    }

    #[test]
    fn test_encode_line_single_field() {
        let m = Measurement::new("myapp.requests", &[("value", FieldValue::from(-5i64))]).unwrap();

        assert_eq!("myapp.requests value=-5i", WireFormat::Line.encode(&m).unwrap());
    }

    #[test]
    fn test_encode_line_multiple_fields() {
        let m = Measurement::new(
            "db.query",
            &[("microseconds", FieldValue::from(1500i64)), ("load", FieldValue::from(0.75))],
        )
        .unwrap();

        assert_eq!("db.query microseconds=1500i,load=0.75", WireFormat::Line.encode(&m).unwrap());
    }

    #[test]
    fn test_encode_line_escapes_special_characters() {
        let m = Measurement::new("page views,total", &[("a=b c", FieldValue::from(1i64))]).unwrap();

        assert_eq!(r"page\ views\,total a\=b\ c=1i", WireFormat::Line.encode(&m).unwrap());
    }
}
