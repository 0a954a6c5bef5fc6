// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{MetricError, MetricResult};
use serde::Serialize;
use std::fmt;

/// Numeric value of a single field in a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A named set of field values sent to InfluxDB as a single point.
///
/// Field names are unique within a measurement and there is always at least
/// one field. No timestamp is carried, the server assigns one on receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    name: String,
    fields: Vec<(String, FieldValue)>,
}

impl Measurement {
    pub fn new<N, K>(name: N, fields: &[(K, FieldValue)]) -> MetricResult<Measurement>
    where
        N: Into<String>,
        K: AsRef<str>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(MetricError::InvalidInput("measurement name is empty"));
        }

        if fields.is_empty() {
            return Err(MetricError::InvalidInput("measurement has no fields"));
        }

        let mut owned: Vec<(String, FieldValue)> = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let key = key.as_ref();
            if key.is_empty() {
                return Err(MetricError::InvalidInput("field name is empty"));
            }

            if owned.iter().any(|(k, _)| k == key) {
                return Err(MetricError::DuplicateField(key.to_owned()));
            }

            if let FieldValue::Float(v) = value {
                if !v.is_finite() {
                    return Err(MetricError::InvalidInput("field value is not finite"));
                }
            }

            owned.push((key.to_owned(), *value));
        }

        Ok(Measurement { name, fields: owned })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Value of the named field, if present.
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = FieldValue> + '_ {
        self.fields.iter().map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Measurement};
    use crate::types::{ErrorKind, MetricError};

    #[test]
    fn test_measurement_keeps_field_order() {
        let m = Measurement::new(
            "requests",
            &[("count", FieldValue::from(3i64)), ("elapsed", FieldValue::from(1.5))],
        )
        .unwrap();

        assert_eq!("requests", m.name());
        assert_eq!(vec!["count", "elapsed"], m.columns().collect::<Vec<_>>());
        assert_eq!(
            vec![FieldValue::Integer(3), FieldValue::Float(1.5)],
            m.values().collect::<Vec<_>>()
        );
        assert_eq!(Some(FieldValue::Float(1.5)), m.field("elapsed"));
        assert_eq!(None, m.field("missing"));
    }

    #[test]
    fn test_measurement_duplicate_field() {
        let res = Measurement::new("requests", &[("value", FieldValue::from(1i64)), ("value", FieldValue::from(2i64))]);

        match res {
            Err(MetricError::DuplicateField(key)) => assert_eq!("value", key),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_measurement_no_fields() {
        let fields: &[(&str, FieldValue)] = &[];
        let err = Measurement::new("requests", fields).unwrap_err();

        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_measurement_empty_names() {
        assert!(Measurement::new("", &[("value", FieldValue::from(1i64))]).is_err());
        assert!(Measurement::new("requests", &[("", FieldValue::from(1i64))]).is_err());
    }

    #[test]
    fn test_measurement_non_finite_value() {
        assert!(Measurement::new("load", &[("value", FieldValue::from(f64::NAN))]).is_err());
        assert!(Measurement::new("load", &[("value", FieldValue::from(f64::INFINITY))]).is_err());
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!("-5", FieldValue::from(-5i64).to_string());
        assert_eq!("2.5", FieldValue::from(2.5).to_string());
    }
}
