//! Protocol Module
//!
//! Binary encoding of procedure parameters and the login exchange.
//!
//! ## Parameter Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Tag (1)  │   Payload (type specific)   │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Tags
//! - -99: ARRAY      - count (2) + tagged elements
//! -   1: NULL       - no payload
//! -   3: BOOL       - 1 byte
//! -   4: SHORT      - 2 bytes
//! -   5: INT        - 4 bytes
//! -   6: LONG       - 8 bytes
//! -   8: FLOAT      - 8 bytes
//! -   9: STRING     - len (4) + UTF-8
//! -  11: TIMESTAMP  - 8 bytes
//! -  25: VARBINARY  - len (4) + bytes
//!
//! Nulls are written as the declared type's tag plus a reserved payload,
//! see [`null`].

mod types;
mod value;
mod marshal;
mod unmarshal;

pub mod primitive;
pub mod null;
pub mod frame;
pub mod login;

pub use types::TypeTag;
pub use value::{Timestamp, Value, WireType};
pub use marshal::{encode, encode_params, marshal, marshal_params, MAX_COUNT};
pub use unmarshal::{unmarshal, unmarshal_params, MAX_ARRAY_DEPTH};
pub use null::marshal_null;
pub use login::{
    build_login_request, encode_login_message, parse_login_response, ConnectionData,
    DigestAlgorithm, Handshake, HandshakeState,
};
