//! `FbiXml` envelopes for requests and responses.

use fishbowl_core::{Fields, RemoteError, Request, StatusCode};

use crate::element::Element;
use crate::error::CodecError;
use crate::latin1;

pub const ROOT: &str = "FbiXml";
pub const TICKET: &str = "Ticket";
pub const KEY: &str = "Key";
pub const REQUESTS: &str = "FbiMsgsRq";
pub const RESPONSES: &str = "FbiMsgsRs";

/// Encode a typed request, with the session key when there is one.
pub fn encode_request<R: Request>(request: &R, key: Option<&str>) -> Result<Vec<u8>, CodecError> {
    encode_message(R::REQUEST_NODE, &request.to_fields(), key)
}

/// Encode a request node by name with flat child fields.
///
/// This is the escape hatch for operations without a typed request.
pub fn encode_message(name: &str, fields: &Fields, key: Option<&str>) -> Result<Vec<u8>, CodecError> {
    let doc = Element::new(ROOT)
        .with_child(ticket(key))
        .with_child(Element::new(REQUESTS).with_child(Element::from_fields(name, fields)));
    latin1::encode(&doc.to_xml())
}

/// A decoded request document (what the server sees).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub key: Option<String>,
    pub message: Element,
}

impl RequestEnvelope {
    pub fn name(&self) -> &str {
        &self.message.name
    }

    pub fn fields(&self) -> Fields {
        self.message.fields()
    }

    /// Rebuild the typed request carried by this envelope.
    pub fn typed<R: Request>(&self) -> Result<R, CodecError> {
        if self.message.name != R::REQUEST_NODE {
            return Err(CodecError::UnexpectedRequest {
                expected: R::REQUEST_NODE,
                found: self.message.name.clone(),
            });
        }
        Ok(R::from_fields(&self.fields())?)
    }
}

pub fn decode_request(bytes: &[u8]) -> Result<RequestEnvelope, CodecError> {
    let root = parse_root(bytes)?;
    let key = ticket_key(&root);
    let message = root
        .children
        .into_iter()
        .find(|c| c.name == REQUESTS)
        .ok_or(CodecError::MissingElement(REQUESTS))?
        .children
        .into_iter()
        .next()
        .ok_or(CodecError::MissingElement("request node"))?;
    Ok(RequestEnvelope { key, message })
}

/// A decoded response document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    key: Option<String>,
    envelope: Element,
}

impl Response {
    /// Build a response around an `FbiMsgsRs` element.
    pub fn new(key: Option<String>, envelope: Element) -> Self {
        Self { key, envelope }
    }

    /// Response whose envelope and single operation node both carry `status`.
    pub fn reply(key: Option<String>, status: StatusCode, node: Element) -> Self {
        let node = node.with_attr("statusCode", status);
        Self::new(
            key,
            Element::new(RESPONSES)
                .with_attr("statusCode", status)
                .with_child(node),
        )
    }

    /// Session key from `Ticket/Key`, if non-empty.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Status of the `FbiMsgsRs` envelope.
    pub fn status(&self) -> Option<StatusCode> {
        self.envelope.status()
    }

    pub fn envelope(&self) -> &Element {
        &self.envelope
    }

    /// Check the envelope and the `node` operation result.
    ///
    /// A missing status counts as success. A failing envelope is a plain
    /// rejection (reported with the operation's own status when it has a
    /// more specific one); a succeeding envelope around a failing operation
    /// node is a partial success and is flagged as such. `Ok(None)` means the
    /// server accepted the message but sent no node named `node`.
    pub fn outcome(&self, node: &str) -> Result<Option<&Element>, RemoteError> {
        let op = self.envelope.child(node);
        let op_failure = op.and_then(|op| {
            op.status()
                .filter(|s| !s.is_success())
                .map(|s| RemoteError::new(node, s, op.status_message().map(str::to_string)))
        });

        if let Some(status) = self.envelope.status().filter(|s| !s.is_success()) {
            return Err(op_failure.unwrap_or_else(|| {
                RemoteError::new(
                    RESPONSES,
                    status,
                    self.envelope.status_message().map(str::to_string),
                )
            }));
        }
        match op_failure {
            Some(err) => Err(err.partial()),
            None => Ok(op),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let doc = Element::new(ROOT)
            .with_child(ticket(self.key.as_deref()))
            .with_child(self.envelope.clone());
        latin1::encode(&doc.to_xml())
    }
}

pub fn decode_response(bytes: &[u8]) -> Result<Response, CodecError> {
    let root = parse_root(bytes)?;
    let key = ticket_key(&root);
    let envelope = root
        .children
        .into_iter()
        .find(|c| c.name == RESPONSES)
        .ok_or(CodecError::MissingElement(RESPONSES))?;
    Ok(Response { key, envelope })
}

fn ticket(key: Option<&str>) -> Element {
    let ticket = Element::new(TICKET);
    match key {
        Some(key) => ticket.with_child(Element::new(KEY).with_text(key)),
        None => ticket,
    }
}

fn ticket_key(root: &Element) -> Option<String> {
    root.child(TICKET)
        .and_then(|t| t.child(KEY))
        .map(|k| k.text.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

fn parse_root(bytes: &[u8]) -> Result<Element, CodecError> {
    let root = Element::parse(&latin1::decode(bytes))?;
    if root.name != ROOT {
        return Err(CodecError::UnexpectedRoot(root.name));
    }
    Ok(root)
}
