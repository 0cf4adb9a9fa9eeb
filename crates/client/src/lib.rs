//! `fishbowl-client`: blocking client for the Fishbowl inventory server.
//!
//! ```no_run
//! use fishbowl_client::{ClientConfig, FishbowlClient};
//! use fishbowl_inventory::Decimal;
//!
//! # fn main() -> fishbowl_client::Result<()> {
//! let config = ClientConfig::new("admin", "admin", "10.0.2.2");
//! let mut client = FishbowlClient::new();
//! client.connect(&config)?;
//! client.add_inventory("B500", 5, 1, Decimal::new(5000, 2), 386)?;
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;

pub use client::{AUDIT_TARGET, Acknowledgement, FishbowlClient, RequestOptions};
pub use config::{AppIdentity, ClientConfig, ConfigError, FileConfig};
pub use connection::Connection;
pub use error::{ConnectionError, Error, Result, TransportError};
