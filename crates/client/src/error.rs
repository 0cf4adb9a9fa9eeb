//! Client error taxonomy.

use std::io;

use fishbowl_codec::{CodecError, FrameError};
use fishbowl_core::{DomainError, RemoteError};

use crate::config::ConfigError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a client call can surface. Nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opening the session failed (unreachable, timed out, or login refused).
    #[error("connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// A domain call was made before `connect` (or after `close`).
    #[error("not connected")]
    NotConnected,

    /// The server answered and rejected (or only partly applied) the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The network failed mid-call; the connection has been dropped.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server's reply could not be decoded, or the request could not
    /// be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// The request failed validation and was never sent.
    #[error("invalid request: {0}")]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("cannot reach {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("timed out connecting to {addr}")]
    Timeout { addr: String },

    #[error("login rejected: {0}")]
    Rejected(#[source] RemoteError),

    #[error("login response carried no session key")]
    MissingKey,

    #[error("login handshake failed: {0}")]
    Handshake(#[source] TransportError),

    #[error("login response could not be decoded: {0}")]
    Protocol(#[source] CodecError),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("timed out waiting for the server")]
    Timeout,

    #[error("connection closed by the server")]
    Closed,

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("i/o error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::Closed,
            _ => Self::Io(err),
        }
    }
}

impl From<FrameError> for TransportError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(err) => err.into(),
            FrameError::TooLarge { len, max } => Self::FrameTooLarge { len, max },
        }
    }
}
