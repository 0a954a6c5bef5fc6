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
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::info;

use crate::endpoint::Endpoint;
use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crate::types::{MetricError, MetricResult};

/// Attempt to convert anything implementing the `ToSocketAddrs` trait
/// into a concrete `SocketAddr` instance, returning an `InvalidInput`
/// error if the address could not be parsed.
#[allow(clippy::needless_pass_by_value)]
fn get_addr<A: ToSocketAddrs>(addr: A) -> MetricResult<SocketAddr> {
    match addr.to_socket_addrs()?.next() {
        Some(addr) => Ok(addr),
        None => Err(MetricError::InvalidInput("No socket addresses yielded")),
    }
}

/// Implementation of a `MetricSink` that emits measurements over UDP.
///
/// Each payload is sent as a single datagram when the `.emit()` method is
/// called, in the thread of the caller. There is no buffering, batching,
/// acknowledgement or retry: a failed send is reported to the caller of
/// `emit` and counted as dropped in the sink stats.
#[derive(Debug)]
pub struct UdpMetricSink {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpMetricSink {
    /// Construct a new `UdpMetricSink` instance.
    ///
    /// The address should be the address of the InfluxDB UDP input to
    /// emit measurements to. The socket should already be bound to a
    /// local address with any desired configuration applied (blocking vs
    /// non-blocking, timeouts, etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use tally::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// socket.set_nonblocking(true).unwrap();
    /// let host = ("metrics.example.com", DEFAULT_PORT);
    /// let sink = UdpMetricSink::from(host, socket);
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn from<A>(to_addr: A, socket: UdpSocket) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        let stats = SocketStats::default();
        Ok(UdpMetricSink { addr, socket, stats })
    }

    /// Resolve the host of an `Endpoint` and bind a non-blocking socket
    /// to an ephemeral local port to send measurements from.
    ///
    /// # Failures
    ///
    /// This method may fail if the host can't be resolved or a local
    /// socket can't be bound.
    pub fn open(endpoint: &Endpoint) -> MetricResult<UdpMetricSink> {
        let addr = get_addr(endpoint.socket_target())?;
        let local = if addr.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };

        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;

        info!("Sending stats to InfluxDB at {} ({})", endpoint.host(), endpoint.database());
        UdpMetricSink::from(addr, socket)
    }

    /// Address measurements are sent to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl MetricSink for UdpMetricSink {
    fn emit(&self, payload: &str) -> io::Result<usize> {
        self.stats
            .update(self.socket.send_to(payload.as_bytes(), self.addr), payload.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}
