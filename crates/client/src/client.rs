//! The `FishbowlClient` facade.

use tracing::{debug, info, warn};

use fishbowl_codec::{
    Element, ExecuteQuery, Response, decode_response, encode_message, encode_request, latin1,
    parse_part_locations, parse_rows,
};
use fishbowl_core::{
    Fields, LocationId, LocationTagNum, PartNumber, RemoteError, Request, StatusCode, UomId,
};
use fishbowl_inventory::{
    CycleCountRequest, Decimal, InventoryAdjustmentRequest, PartLocation, PartQuantityRequest,
    TotalInventoryRequest,
};

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{Error, Result, TransportError};

/// `tracing` target of the one-line audit records written after each
/// successful change.
pub const AUDIT_TARGET: &str = "fishbowl::audit";

/// Successful result of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// Response node that was checked, e.g. `AddInventoryRs`.
    pub operation: String,
    pub status: StatusCode,
    pub message: String,
}

/// How [`FishbowlClient::send_request_with`] shapes its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Return the first child of the response node instead of the node
    /// itself (an empty element when it has none).
    pub single: bool,
    /// Answer a server-reported failure with an empty element instead of
    /// [`Error::Remote`]. Transport and protocol errors still fail.
    pub silence_errors: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    #[must_use]
    pub fn silence_errors(mut self) -> Self {
        self.silence_errors = true;
        self
    }
}

/// An owned client with at most one live session.
///
/// States are "disconnected" and "connected"; every domain call requires
/// "connected" and fails with [`Error::NotConnected`] otherwise. A transport
/// failure mid-call drops the session. Dropping the client closes it.
#[derive(Debug, Default)]
pub struct FishbowlClient {
    connection: Option<Connection>,
}

impl FishbowlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect, run `f`, and close the session whatever `f` returned.
    pub fn with_session<T>(
        config: &ClientConfig,
        f: impl FnOnce(&mut FishbowlClient) -> Result<T>,
    ) -> Result<T> {
        let mut client = Self::new();
        client.connect(config)?;
        let result = f(&mut client);
        client.close();
        result
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open a session. An existing session is closed first.
    pub fn connect(&mut self, config: &ClientConfig) -> Result<()> {
        if self.connection.is_some() {
            debug!("already connected; closing the previous session");
            self.close();
        }
        self.connection = Some(Connection::open(config)?);
        Ok(())
    }

    /// Add `quantity` of a part at a location tag, at `cost` per unit.
    pub fn add_inventory(
        &mut self,
        part_number: &str,
        quantity: impl Into<Decimal>,
        unit_of_measure_id: u32,
        cost: impl Into<Decimal>,
        location_tag_num: u64,
    ) -> Result<Acknowledgement> {
        self.ensure_connected()?;
        let request = InventoryAdjustmentRequest::new(
            PartNumber::new(part_number)?,
            quantity.into(),
            UomId::new(unit_of_measure_id),
            cost.into(),
            LocationTagNum::new(location_tag_num),
        )?;
        self.submit(&request)
    }

    /// Overwrite the counted quantity of a part at a location.
    pub fn cycle_inventory(
        &mut self,
        part_number: &str,
        new_qty: impl Into<Decimal>,
        location_id: u64,
    ) -> Result<Acknowledgement> {
        self.ensure_connected()?;
        let request = CycleCountRequest::new(
            PartNumber::new(part_number)?,
            new_qty.into(),
            LocationId::new(location_id),
        )?;
        self.submit(&request)
    }

    /// Every location holding a part, with its quantities. With
    /// `location_group`, only locations in that group are returned.
    pub fn get_locations(
        &mut self,
        part_number: &str,
        location_group: Option<&str>,
    ) -> Result<Vec<PartLocation>> {
        let node = self.get_part_info(part_number)?;
        let mut locations = parse_part_locations(&node)?;
        if let Some(group) = location_group {
            locations.retain(|loc| loc.in_group(group));
        }
        Ok(locations)
    }

    /// The raw `InventoryQuantityRs` node for a part.
    pub fn get_part_info(&mut self, part_number: &str) -> Result<Element> {
        self.ensure_connected()?;
        let request = PartQuantityRequest::new(PartNumber::new(part_number)?);
        self.fetch(&request)
    }

    /// The raw `GetTotalInventoryRs` node for a part in a location group.
    pub fn get_total_inventory(
        &mut self,
        part_number: &str,
        location_group: &str,
    ) -> Result<Element> {
        self.ensure_connected()?;
        let request = TotalInventoryRequest::new(PartNumber::new(part_number)?, location_group)?;
        self.fetch(&request)
    }

    /// Send any typed request and check its response node.
    pub fn submit<R: Request>(&mut self, request: &R) -> Result<Acknowledgement> {
        let response = self.round_trip(R::REQUEST_NODE, |key| encode_request(request, Some(key)))?;
        let ack = acknowledge(&response, R::RESPONSE_NODE)?;
        info!(
            target: AUDIT_TARGET,
            operation = R::AUDIT_LABEL,
            "{}",
            audit_line(R::AUDIT_LABEL, &request.to_fields())
        );
        Ok(ack)
    }

    /// Send a request by node name with flat child fields and return the
    /// response node (an empty element if the server sent none).
    pub fn send_request(&mut self, name: &str, fields: &Fields) -> Result<Element> {
        self.send_request_with(name, fields, RequestOptions::default())
    }

    /// [`send_request`](Self::send_request) with result shaping.
    pub fn send_request_with(
        &mut self,
        name: &str,
        fields: &Fields,
        options: RequestOptions,
    ) -> Result<Element> {
        let response = self.round_trip(name, |key| encode_message(name, fields, Some(key)))?;
        let node = match response.outcome(&response_node_name(name)) {
            Ok(node) => node.cloned().unwrap_or_else(empty),
            Err(err) if options.silence_errors => {
                debug!(request = name, error = %err, "server error silenced");
                return Ok(empty());
            }
            Err(err) => return Err(err.into()),
        };
        if options.single {
            return Ok(node.children.into_iter().next().unwrap_or_else(empty));
        }
        Ok(node)
    }

    /// Run a SQL query on the server. Column lookup on each row ignores case.
    pub fn execute_query(&mut self, sql: &str) -> Result<Vec<Fields>> {
        self.ensure_connected()?;
        let query = ExecuteQuery::new(sql)?;
        let response = self.round_trip(ExecuteQuery::REQUEST_NODE, |key| {
            encode_request(&query, Some(key))
        })?;
        match response.outcome(ExecuteQuery::RESPONSE_NODE)? {
            Some(node) => Ok(parse_rows(node)?),
            None => Ok(Vec::new()),
        }
    }

    /// End the session. Safe to call any number of times; never fails.
    pub fn close(&mut self) {
        match self.connection.take() {
            Some(conn) => conn.close(),
            None => debug!("close called while not connected"),
        }
    }

    /// Send a read-only request and return its response node.
    fn fetch<R: Request>(&mut self, request: &R) -> Result<Element> {
        let response = self.round_trip(R::REQUEST_NODE, |key| encode_request(request, Some(key)))?;
        let node = response.outcome(R::RESPONSE_NODE)?;
        Ok(node.cloned().unwrap_or_else(empty))
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connection.is_none() {
            warn!("API method called but Fishbowl is not connected");
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn round_trip(
        &mut self,
        label: &str,
        encode: impl FnOnce(&str) -> std::result::Result<Vec<u8>, fishbowl_codec::CodecError>,
    ) -> Result<Response> {
        let Some(conn) = self.connection.as_mut() else {
            warn!(request = label, "API method called but Fishbowl is not connected");
            return Err(Error::NotConnected);
        };

        let body = encode(conn.key())?;
        info!(request = label, "sending message");
        debug!(request = label, body = %redacted(&body, conn.key()), "request body");

        match conn.exchange(&body) {
            Ok(reply) => {
                debug!(request = label, body = %redacted(&reply, conn.key()), "response body");
                Ok(decode_response(&reply)?)
            }
            Err(err) => {
                self.poison(label, &err);
                Err(err.into())
            }
        }
    }

    /// Drop a session whose socket is in an unknown state.
    fn poison(&mut self, label: &str, err: &TransportError) {
        if let Some(conn) = self.connection.take() {
            warn!(
                request = label,
                peer = conn.peer(),
                error = %err,
                "transport failure; dropping connection"
            );
        }
    }
}

impl Drop for FishbowlClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn acknowledge(response: &Response, node: &str) -> std::result::Result<Acknowledgement, RemoteError> {
    let op = response.outcome(node)?;
    let status = op
        .and_then(Element::status)
        .or_else(|| response.status())
        .unwrap_or(StatusCode::SUCCESS);
    let message = op
        .and_then(Element::status_message)
        .or_else(|| response.envelope().status_message())
        .map(str::to_string)
        .unwrap_or_else(|| status.description().unwrap_or_default().to_string());
    Ok(Acknowledgement {
        operation: node.to_string(),
        status,
        message,
    })
}

fn empty() -> Element {
    Element::new("empty")
}

/// `FooRq` answers as `FooRs`.
fn response_node_name(request: &str) -> String {
    match request.strip_suffix("Rq") {
        Some(stem) => format!("{stem}Rs"),
        None => format!("{request}Rs"),
    }
}

/// `add_inv,B500,5,1,50.00,386`
fn audit_line(label: &str, fields: &Fields) -> String {
    let mut line = String::from(label);
    for (_, value) in fields.iter() {
        line.push(',');
        line.push_str(value);
    }
    line
}

fn redacted(body: &[u8], key: &str) -> String {
    let text = latin1::decode(body);
    if key.is_empty() {
        text
    } else {
        text.replace(key, "<session-key>")
    }
}
