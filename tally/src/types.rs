// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

/// Errors produced while turning a configuration string into an `Endpoint`.
///
/// These only ever surface at startup, from `Endpoint::parse` or from the
/// constructors of `MetricsEmitter` that accept a URI.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The URI used a scheme other than `influxdb`.
    #[error("invalid influxdb scheme: {0}")]
    InvalidScheme(String),

    /// The URI could not be parsed at all.
    #[error("malformed influxdb uri: {0}")]
    MalformedUri(#[from] url::ParseError),

    /// A percent-encoded part of the URI did not decode to UTF-8.
    #[error("invalid encoding in influxdb uri {0}")]
    InvalidEncoding(String),
}

/// Broad category of a `MetricError`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    InvalidInput,
    IoError,
    FormatError,
    ConfigError,
}

/// Error encountered while creating a transport or sending a metric.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to serialize measurement: {0}")]
    Format(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MetricError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetricError::InvalidInput(_) | MetricError::DuplicateField(_) => ErrorKind::InvalidInput,
            MetricError::Io(_) => ErrorKind::IoError,
            MetricError::Format(_) => ErrorKind::FormatError,
            MetricError::Config(_) => ErrorKind::ConfigError,
        }
    }
}

pub type MetricResult<T> = Result<T, MetricError>;
