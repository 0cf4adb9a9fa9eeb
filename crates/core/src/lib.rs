//! `fishbowl-core`: domain building blocks for the Fishbowl client.
//!
//! This crate contains **pure domain** primitives (no IO, no wire format).

pub mod error;
pub mod id;
pub mod request;
pub mod status;
pub mod value_object;

pub use error::{DomainError, DomainResult, RemoteError};
pub use id::{LocationId, LocationTagNum, PartNumber, UomId};
pub use request::{Fields, Request};
pub use status::StatusCode;
pub use value_object::ValueObject;
