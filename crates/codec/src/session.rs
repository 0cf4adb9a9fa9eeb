//! Login and logout messages.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};

use fishbowl_core::{DomainError, DomainResult, Fields, Request, ValueObject};

use crate::error::CodecError;
use crate::latin1;

/// Digest the server expects in `UserPassword`: base64 of the MD5 of the
/// Latin-1 encoded password.
pub fn password_digest(password: &str) -> Result<String, CodecError> {
    let bytes = latin1::encode(password)?;
    Ok(STANDARD.encode(Md5::digest(&bytes)))
}

/// `LoginRq`: identifies the integrated application and the user.
///
/// `password_digest` must already be digested with [`password_digest`]; the
/// plain password never enters a message.
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub app_id: u32,
    pub app_name: String,
    pub app_description: String,
    pub username: String,
    pub password_digest: String,
}

impl core::fmt::Debug for Login {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Login")
            .field("app_id", &self.app_id)
            .field("app_name", &self.app_name)
            .field("app_description", &self.app_description)
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .finish()
    }
}

impl ValueObject for Login {}

impl Request for Login {
    const REQUEST_NODE: &'static str = "LoginRq";
    const RESPONSE_NODE: &'static str = "LoginRs";
    const AUDIT_LABEL: &'static str = "login";

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("IAID", self.app_id)
            .with("IAName", &self.app_name)
            .with("IADescription", &self.app_description)
            .with("UserName", &self.username)
            .with("UserPassword", &self.password_digest)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        let username = fields.require("UserName")?.to_string();
        if username.trim().is_empty() {
            return Err(DomainError::validation("user name cannot be empty"));
        }
        Ok(Self {
            app_id: fields.parse("IAID")?,
            app_name: fields.require("IAName")?.to_string(),
            app_description: fields.get("IADescription").unwrap_or_default().to_string(),
            username,
            password_digest: fields.require("UserPassword")?.to_string(),
        })
    }
}

/// `LogoutRq`: ends the session named by the envelope ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logout;

impl ValueObject for Logout {}

impl Request for Logout {
    const REQUEST_NODE: &'static str = "LogoutRq";
    const RESPONSE_NODE: &'static str = "LogoutRs";
    const AUDIT_LABEL: &'static str = "logout";

    fn to_fields(&self) -> Fields {
        Fields::new()
    }

    fn from_fields(_fields: &Fields) -> DomainResult<Self> {
        Ok(Self)
    }
}
