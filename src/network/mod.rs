//! Network Module
//!
//! Blocking TCP client connections.
//!
//! ## Lifecycle
//! - Connect with timeouts
//! - Run the login handshake
//! - Hand the buffered halves to the request layer

mod connection;

pub use connection::Connection;
