//! # voltwire
//!
//! Wire-level core of a database client:
//! - Self-describing binary encoding of procedure parameters
//! - Sentinel encodings for typed nulls
//! - Login handshake that authenticates a session
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Request Layer                            │
//! │              (procedure calls, external)                     │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               ▼
//!   ┌────────────────────────┐       ┌────────────────────────┐
//!   │    Value Marshaller    │       │    Login Handshake     │
//!   │  (tag + payload, null  │       │  (digest, request,     │
//!   │   sentinels, arrays)   │       │   response parsing)    │
//!   └───────────┬────────────┘       └───────────┬────────────┘
//!               │                                │
//!               ▼                                ▼
//!   ┌─────────────────────────────────────────────────────────┐
//!   │        Primitive Codec + Framing (big-endian)           │
//!   └─────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::ClientConfig;
pub use protocol::{ConnectionData, Timestamp, TypeTag, Value};
pub use network::Connection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of voltwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
