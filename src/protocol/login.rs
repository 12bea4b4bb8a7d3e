//! Login handshake
//!
//! ## Request body
//! ```text
//! ┌──────────────────┬──────────────────┬──────────────────────┐
//! │ "database" (str) │ username (str)   │ digest (len + bytes) │
//! └──────────────────┴──────────────────┴──────────────────────┘
//! ```
//! The digest is SHA-1 (20 bytes) for protocol version 0 and SHA-256
//! (32 bytes) for every later version.
//!
//! ## Request envelope
//! ```text
//! ┌──────────┬─────────────┬────────────┬──────────────┐
//! │ Len (4)  │ Version (1) │ Scheme (1) │ Request body │
//! └──────────┴─────────────┴────────────┴──────────────┘
//! ```
//!
//! ## Response body (after the length and version byte)
//! ```text
//! ┌────────────┬─────────────┬──────────────┬───────────────┬────────────┬──────────────┐
//! │ Status (1) │ Host ID (4) │ Conn ID (8)  │ Start TS (8)  │ Leader (4) │ Build (str)  │
//! └────────────┴─────────────┴──────────────┴───────────────┴────────────┴──────────────┘
//! ```
//! Only the status byte is present when the status is non-zero.

use std::fmt;
use std::io::{Cursor, Read, Write};
use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use super::frame::{encode_frame, read_frame};
use super::primitive::{read_byte, read_int, read_long, read_string, write_string, write_varbinary};
use crate::config::ClientConfig;
use crate::error::{Result, WireError};

/// Service requested by every client login
pub const SERVICE_NAME: &str = "database";

/// Status byte of a successful login
pub const STATUS_OK: u8 = 0x00;

// =============================================================================
// Digest Selection
// =============================================================================

/// Password digest algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DigestAlgorithm {
    /// Legacy, protocol version 0
    Sha1 = 0x00,
    Sha256 = 0x01,
}

impl DigestAlgorithm {
    pub fn for_protocol_version(protocol_version: u8) -> Self {
        if protocol_version == 0 {
            DigestAlgorithm::Sha1
        } else {
            DigestAlgorithm::Sha256
        }
    }

    /// Digest size in bytes
    pub fn digest_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    /// Scheme byte announced in the request envelope
    pub fn scheme_byte(self) -> u8 {
        self as u8
    }

    pub fn digest(self, password: &str) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(password.as_bytes()).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(password.as_bytes()).to_vec(),
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Build the login request body
pub fn build_login_request(protocol_version: u8, username: &str, password: &str) -> Result<Bytes> {
    let digest = DigestAlgorithm::for_protocol_version(protocol_version).digest(password);

    let mut buf = BytesMut::with_capacity(
        4 + SERVICE_NAME.len() + 4 + username.len() + 4 + digest.len(),
    );
    write_string(&mut buf, SERVICE_NAME)?;
    write_string(&mut buf, username)?;
    write_varbinary(&mut buf, &digest)?;
    Ok(buf.freeze())
}

/// Build the complete login message: length, version, scheme, body
pub fn encode_login_message(protocol_version: u8, username: &str, password: &str) -> Result<Vec<u8>> {
    let body = build_login_request(protocol_version, username, password)?;
    let algorithm = DigestAlgorithm::for_protocol_version(protocol_version);

    let mut envelope = BytesMut::with_capacity(2 + body.len());
    envelope.put_u8(protocol_version);
    envelope.put_u8(algorithm.scheme_byte());
    envelope.put_slice(&body);

    encode_frame(&envelope)
}

// =============================================================================
// Response
// =============================================================================

/// Session metadata from a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionData {
    pub host_id: i32,
    pub connection_id: i64,
    /// Raw IPv4 address of the cluster leader
    pub leader_addr: i32,
    pub build_string: String,
}

impl ConnectionData {
    pub fn leader_ipv4(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.leader_addr as u32)
    }
}

/// Parse a login response body
///
/// Reads nothing past the status byte when the login was rejected.
pub fn parse_login_response<R: Read>(reader: &mut R) -> Result<ConnectionData> {
    let status = read_byte(reader)? as u8;
    if status != STATUS_OK {
        return Err(WireError::AuthenticationFailed { status });
    }

    let host_id = read_int(reader)?;
    let connection_id = read_long(reader)?;
    let _cluster_start = read_long(reader)?;
    let leader_addr = read_int(reader)?;
    let build_string = read_string(reader)?;

    Ok(ConnectionData {
        host_id,
        connection_id,
        leader_addr,
        build_string,
    })
}

// =============================================================================
// Handshake State Machine
// =============================================================================

/// Progress of a login handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    NotStarted,
    RequestSent,
    Authenticated,
    Rejected,
}

/// One login exchange over a stream
///
/// `NotStarted -> RequestSent -> Authenticated | Rejected`. Both end states
/// are terminal.
pub struct Handshake {
    state: HandshakeState,
    protocol_version: u8,
    username: String,
    password: String,
    max_frame_size: usize,
    connection_data: Option<ConnectionData>,
}

impl Handshake {
    pub fn new(protocol_version: u8, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            state: HandshakeState::NotStarted,
            protocol_version,
            username: username.into(),
            password: password.into(),
            max_frame_size: super::frame::MAX_FRAME_SIZE,
            connection_data: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut handshake = Self::new(config.protocol_version, &config.username, &config.password);
        handshake.max_frame_size = config.max_frame_size;
        handshake
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn connection_data(&self) -> Option<&ConnectionData> {
        self.connection_data.as_ref()
    }

    pub fn into_connection_data(self) -> Option<ConnectionData> {
        self.connection_data
    }

    /// Write and flush the login request
    pub fn send_request<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        self.expect_state(HandshakeState::NotStarted, "send_request")?;

        let message = encode_login_message(self.protocol_version, &self.username, &self.password)?;
        writer.write_all(&message)?;
        writer.flush()?;

        self.state = HandshakeState::RequestSent;
        tracing::debug!(
            username = %self.username,
            protocol_version = self.protocol_version,
            "login request sent"
        );
        Ok(())
    }

    /// Read the login response; any failure ends the handshake
    pub fn receive_response<R: Read>(&mut self, reader: &mut R) -> Result<&ConnectionData> {
        self.expect_state(HandshakeState::RequestSent, "receive_response")?;

        match self.read_response(reader) {
            Ok(data) => {
                tracing::debug!(
                    host_id = data.host_id,
                    connection_id = data.connection_id,
                    leader = %data.leader_ipv4(),
                    build = %data.build_string,
                    "authenticated"
                );
                self.state = HandshakeState::Authenticated;
                let data = self.connection_data.insert(data);
                Ok(&*data)
            }
            Err(e) => {
                if let WireError::AuthenticationFailed { status } = e {
                    tracing::warn!(username = %self.username, status, "login rejected");
                }
                self.state = HandshakeState::Rejected;
                Err(e)
            }
        }
    }

    fn read_response<R: Read>(&self, reader: &mut R) -> Result<ConnectionData> {
        let body = read_frame(reader, self.max_frame_size)?;
        let mut cursor = Cursor::new(body);

        let version = read_byte(&mut cursor)?;
        tracing::trace!(server_version = version, "login response received");

        parse_login_response(&mut cursor)
    }

    fn expect_state(&self, expected: HandshakeState, op: &str) -> Result<()> {
        if self.state != expected {
            return Err(WireError::InvalidState(format!(
                "{} requires {:?}, handshake is {:?}",
                op, expected, self.state
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Handshake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handshake")
            .field("state", &self.state)
            .field("protocol_version", &self.protocol_version)
            .field("username", &self.username)
            .field("connection_data", &self.connection_data)
            .finish_non_exhaustive()
    }
}
