//! Session lifecycle: open a socket, log in, exchange frames, log out.
//!
//! A [`Connection`] only exists after a successful login, so holding one is
//! proof that requests may be sent. It owns the socket and the session key;
//! both go away when it is closed or dropped.

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use tracing::{debug, info, warn};

use fishbowl_codec::{
    Login, Logout, decode_response, encode_request, password_digest, read_frame, write_frame,
};
use fishbowl_core::{RemoteError, Request, StatusCode};

use crate::config::ClientConfig;
use crate::error::{ConnectionError, Error, TransportError};

pub struct Connection {
    stream: TcpStream,
    session_key: String,
    peer: String,
    max_frame_len: usize,
}

impl Connection {
    /// Connect and log in. One attempt per resolved address, no retries.
    pub fn open(config: &ClientConfig) -> Result<Self, Error> {
        config.validate()?;
        let peer = config.address();
        info!(peer = %peer, user = %config.username, "connecting to Fishbowl");

        let stream = dial(config, &peer)?;
        stream
            .set_read_timeout(Some(config.timeout()))
            .and_then(|()| stream.set_write_timeout(Some(config.timeout())))
            .and_then(|()| stream.set_nodelay(true))
            .map_err(|source| ConnectionError::Unreachable {
                addr: peer.clone(),
                source,
            })?;

        let mut conn = Self {
            stream,
            session_key: String::new(),
            peer,
            max_frame_len: config.max_frame_len,
        };

        match conn.login(config) {
            Ok(key) => {
                conn.session_key = key;
                info!(peer = %conn.peer, "logged in");
                Ok(conn)
            }
            Err(err) => {
                warn!(peer = %conn.peer, error = %err, "login failed, closing socket");
                conn.shutdown();
                Err(err.into())
            }
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Session key to put in every request ticket.
    pub fn key(&self) -> &str {
        &self.session_key
    }

    /// Send one framed body and wait for the framed reply.
    pub fn exchange(&mut self, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        write_frame(&mut self.stream, body)?;
        Ok(read_frame(&mut self.stream, self.max_frame_len)?)
    }

    /// Log out and release the socket. Never fails: problems are logged.
    pub fn close(mut self) {
        match self.logout() {
            Ok(()) => debug!(peer = %self.peer, "logged out"),
            Err(err) => warn!(peer = %self.peer, error = %err, "logout failed; closing anyway"),
        }
        self.session_key.clear();
        self.shutdown();
        info!(peer = %self.peer, "disconnected");
    }

    fn login(&mut self, config: &ClientConfig) -> Result<String, ConnectionError> {
        let login = Login {
            app_id: config.app.id,
            app_name: config.app.name.clone(),
            app_description: config.app.description.clone(),
            username: config.username.clone(),
            password_digest: password_digest(&config.password).map_err(ConnectionError::Protocol)?,
        };
        let body = encode_request(&login, None).map_err(ConnectionError::Protocol)?;
        let reply = self.exchange(&body).map_err(|err| match err {
            TransportError::Timeout => ConnectionError::Timeout {
                addr: self.peer.clone(),
            },
            other => ConnectionError::Handshake(other),
        })?;

        let response = decode_response(&reply).map_err(ConnectionError::Protocol)?;
        response
            .outcome(Login::RESPONSE_NODE)
            .map_err(ConnectionError::Rejected)?;
        response
            .key()
            .map(str::to_string)
            .ok_or(ConnectionError::MissingKey)
    }

    fn logout(&mut self) -> Result<(), Error> {
        let body = encode_request(&Logout, Some(self.session_key.as_str()))?;
        let reply = self.exchange(&body)?;
        let response = decode_response(&reply)?;
        match response.status() {
            None | Some(StatusCode::LOGGED_OUT) => Ok(()),
            Some(status) => Err(RemoteError::new(
                "FbiMsgsRs",
                status,
                response.envelope().status_message().map(str::to_string),
            )
            .into()),
        }
    }

    fn shutdown(&self) {
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            // The peer may already have gone away.
            if err.kind() != io::ErrorKind::NotConnected {
                debug!(peer = %self.peer, error = %err, "socket shutdown failed");
            }
        }
    }
}

impl core::fmt::Debug for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.peer)
            .field("session_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn dial(config: &ClientConfig, peer: &str) -> Result<TcpStream, ConnectionError> {
    let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|source| ConnectionError::Unreachable {
            addr: peer.to_string(),
            source,
        })?
        .collect();

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, config.connect_timeout()) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                debug!(%addr, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) if matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
            Err(ConnectionError::Timeout {
                addr: peer.to_string(),
            })
        }
        Some(source) => Err(ConnectionError::Unreachable {
            addr: peer.to_string(),
            source,
        }),
        None => Err(ConnectionError::Unreachable {
            addr: peer.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses"),
        }),
    }
}
