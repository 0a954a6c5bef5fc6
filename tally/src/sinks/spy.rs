// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io::{self, ErrorKind};

/// `MetricSink` implementation that writes all payloads to the `Sender` half of
/// a channel while callers are given ownership of the `Receiver` half.
///
/// This is not a general purpose sink, rather it's a sink meant for verifying
/// measurements written during the course of tests. By default, the channel
/// used is unbounded. The channel size can be limited using the `with_capacity`
/// method, in which case payloads that don't fit are reported as `WouldBlock`
/// errors, the same way a full socket buffer would be.
///
/// Each payload is sent to the underlying channel when the `.emit()` method is
/// called, in the thread of the caller.
#[derive(Debug)]
pub struct SpyMetricSink {
    sender: Sender<Vec<u8>>,
    stats: SocketStats,
}

impl SpyMetricSink {
    pub fn new() -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<Vec<u8>>, Self) {
        let (tx, rx) = match queue {
            Some(v) => bounded(v),
            None => unbounded(),
        };

        let sink = SpyMetricSink {
            sender: tx,
            stats: SocketStats::default(),
        };
        (rx, sink)
    }
}

impl MetricSink for SpyMetricSink {
    fn emit(&self, payload: &str) -> io::Result<usize> {
        let res = match self.sender.try_send(payload.as_bytes().to_vec()) {
            Ok(()) => Ok(payload.len()),
            Err(TrySendError::Full(_)) => Err(io::Error::new(ErrorKind::WouldBlock, "spy channel is full")),
            Err(TrySendError::Disconnected(_)) => Err(io::Error::new(ErrorKind::NotConnected, "spy channel is closed")),
        };

        self.stats.update(res, payload.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}
