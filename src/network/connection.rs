//! Client Connection
//!
//! A blocking TCP connection that is authenticated on open.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{Result, WireError};
use crate::protocol::{ConnectionData, Handshake};

/// An authenticated connection to a server
pub struct Connection<S: Read + Write = TcpStream> {
    /// Read half (buffered for efficiency)
    reader: BufReader<S>,

    /// Write half (buffered for efficiency)
    writer: BufWriter<S>,

    /// Session metadata from the handshake
    data: ConnectionData,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Connect to `config.addr` and log in
    ///
    /// Sets up buffered I/O and configures timeouts before the handshake
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = resolve(&config.addr)?;
        tracing::debug!("Connecting to {}", addr);

        let stream = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))?
        } else {
            TcpStream::connect(addr)?
        };

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let read_stream = stream.try_clone()?;
        Self::login(read_stream, stream, addr.to_string(), config)
    }
}

impl<S: Read + Write> Connection<S> {
    /// Log in over already-open read and write halves
    pub fn login(read_half: S, write_half: S, peer_addr: String, config: &ClientConfig) -> Result<Self> {
        let mut reader = BufReader::new(read_half);
        let mut writer = BufWriter::new(write_half);

        let mut handshake = Handshake::from_config(config);
        handshake.send_request(&mut writer)?;
        handshake.receive_response(&mut reader)?;

        let data = handshake
            .into_connection_data()
            .ok_or_else(|| WireError::InvalidState("handshake finished without data".to_string()))?;

        tracing::info!(
            "Logged in to {} as host {} (connection {})",
            peer_addr,
            data.host_id,
            data.connection_id
        );

        Ok(Self {
            reader,
            writer,
            data,
            peer_addr,
        })
    }

    /// Session metadata from the handshake
    pub fn data(&self) -> &ConnectionData {
        &self.data
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Buffered read half, for the request layer
    pub fn reader(&mut self) -> &mut BufReader<S> {
        &mut self.reader
    }

    /// Buffered write half, for the request layer
    pub fn writer(&mut self) -> &mut BufWriter<S> {
        &mut self.writer
    }
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()?
        .next()
        .ok_or_else(|| WireError::Config(format!("address {} did not resolve", addr)))
}
