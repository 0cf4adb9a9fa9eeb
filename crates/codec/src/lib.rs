//! `fishbowl-codec`: wire representation of the Fishbowl XML API.
//!
//! Every exchange is one framed XML document:
//!
//! ```text
//! [u32 big-endian length][Latin-1 XML body]
//! ```
//!
//! Requests are wrapped as `FbiXml/Ticket/Key` + `FbiXml/FbiMsgsRq/<XxxRq>`,
//! responses come back as `FbiXml/FbiMsgsRs/<XxxRs>` with `statusCode`
//! attributes on both the envelope and the operation node.
//!
//! Encoding is pure; nothing here touches a socket except through the
//! generic `Read`/`Write` framing helpers.

pub mod element;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod latin1;
pub mod query;
pub mod session;
pub mod stock;

pub use element::Element;
pub use envelope::{
    RequestEnvelope, Response, decode_request, decode_response, encode_message, encode_request,
};
pub use error::CodecError;
pub use frame::{DEFAULT_MAX_FRAME_LEN, FrameError, read_frame, write_frame};
pub use query::{ExecuteQuery, parse_rows};
pub use session::{Login, Logout, password_digest};
pub use stock::parse_part_locations;
