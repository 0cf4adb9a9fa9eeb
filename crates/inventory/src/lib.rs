//! Inventory requests sent to the Fishbowl server.
//!
//! This crate contains the request value objects and their validation rules,
//! implemented as deterministic domain logic (no IO, no wire format).

pub mod adjustment;
pub mod cycle_count;
pub mod stock;

pub use adjustment::InventoryAdjustmentRequest;
pub use cycle_count::CycleCountRequest;
pub use rust_decimal::Decimal;
pub use stock::{PartLocation, PartQuantityRequest, TotalInventoryRequest};
