//! In-process Fishbowl stand-in bound to an ephemeral port.
#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use fishbowl_client::ClientConfig;
use fishbowl_codec::{
    DEFAULT_MAX_FRAME_LEN, Element, Login, RequestEnvelope, Response, decode_request,
    password_digest, read_frame, write_frame,
};
use fishbowl_core::StatusCode;
use fishbowl_inventory::{
    CycleCountRequest, InventoryAdjustmentRequest, PartQuantityRequest, TotalInventoryRequest,
};

pub const SESSION_KEY: &str = "TESTKEY";
pub const KNOWN_PART: &str = "B500";
pub const KNOWN_LOCATION: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Never answer `AddInventoryRq`.
    Silent,
    /// Accept `AddInventoryRq` at the envelope but fail the operation node.
    PartialAdd,
    /// Accept logins without handing out a ticket key.
    KeylessLogin,
    /// Answer `AddInventoryRq` with a frame larger than [`OVERSIZED_REPLY`].
    OversizedReply,
    /// Refuse `LogoutRq` with a general error instead of `1010`.
    RefuseLogout,
}

/// Lower bound on the size of replies in [`Mode::OversizedReply`].
pub const OVERSIZED_REPLY: usize = 4096;

#[derive(Debug, Default)]
struct State {
    requests: Vec<String>,
    accepted: usize,
    closed: usize,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn spawn() -> Self {
        Self::spawn_with(Mode::Normal)
    }

    pub fn spawn_with(mode: Mode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind ephemeral port");
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(Mutex::new(State::default()));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let state = Arc::clone(&state);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    match listener.accept() {
                        Ok((stream, _)) => {
                            stream.set_nonblocking(false).unwrap();
                            state.lock().unwrap().accepted += 1;
                            let state = Arc::clone(&state);
                            thread::spawn(move || serve(stream, mode, state));
                        }
                        Err(_) => thread::sleep(Duration::from_millis(5)),
                    }
                }
            })
        };

        Self {
            addr,
            state,
            stop,
            handle: Some(handle),
        }
    }

    pub fn config(&self, username: &str, password: &str) -> ClientConfig {
        ClientConfig::new(username, password, self.addr.ip().to_string())
            .with_port(self.addr.port())
            .with_timeout(Duration::from_millis(500))
    }

    pub fn admin(&self) -> ClientConfig {
        self.config("admin", "admin")
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn accepted(&self) -> usize {
        self.state.lock().unwrap().accepted
    }

    /// Wait until the server has seen `n` connections end.
    pub fn wait_for_closed(&self, n: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.state.lock().unwrap().closed >= n {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Bound and released, so nothing is listening there.
pub fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn serve(mut stream: TcpStream, mode: Mode, state: Arc<Mutex<State>>) {
    while let Ok(body) = read_frame(&mut stream, DEFAULT_MAX_FRAME_LEN) {
        let request = decode_request(&body).expect("client sent a malformed request");
        state.lock().unwrap().requests.push(request.name().to_string());

        if mode == Mode::Silent && request.name() == "AddInventoryRq" {
            continue;
        }
        let reply = respond(&request, mode).encode().unwrap();
        if write_frame(&mut stream, &reply).is_err() {
            break;
        }
    }
    state.lock().unwrap().closed += 1;
}

fn respond(request: &RequestEnvelope, mode: Mode) -> Response {
    let ok = StatusCode::SUCCESS;
    let name = request.name();
    let rs = format!("{}Rs", name.trim_end_matches("Rq"));

    if name == "LoginRq" {
        let login: Login = request.typed().unwrap();
        let expected = password_digest("admin").unwrap();
        return if login.username == "admin" && login.password_digest == expected {
            let key = (mode != Mode::KeylessLogin).then(|| SESSION_KEY.to_string());
            Response::reply(key, ok, Element::new(rs))
        } else {
            Response::reply(None, StatusCode::new(1120), Element::new(rs))
        };
    }

    if request.key.as_deref() != Some(SESSION_KEY) {
        return Response::new(
            None,
            Element::new("FbiMsgsRs").with_attr("statusCode", 1130),
        );
    }
    let key = Some(SESSION_KEY.to_string());

    match name {
        "LogoutRq" if mode == Mode::RefuseLogout => Response::new(
            None,
            Element::new("FbiMsgsRs")
                .with_attr("statusCode", 1012)
                .with_attr("statusMessage", "General error."),
        ),
        "LogoutRq" => Response::reply(None, StatusCode::LOGGED_OUT, Element::new(rs)),
        "AddInventoryRq" if mode == Mode::PartialAdd => Response::new(
            key,
            Element::new("FbiMsgsRs")
                .with_attr("statusCode", ok)
                .with_child(
                    Element::new(rs)
                        .with_attr("statusCode", 2000)
                        .with_attr("statusMessage", "Part B500 is inactive."),
                ),
        ),
        "AddInventoryRq" if mode == Mode::OversizedReply => {
            let padding = Element::new("Note").with_text("x".repeat(OVERSIZED_REPLY));
            Response::reply(key, ok, Element::new(rs).with_child(padding))
        }
        "AddInventoryRq" => {
            let add: InventoryAdjustmentRequest = request.typed().unwrap();
            let status = if add.part_number().as_ref() == KNOWN_PART {
                ok
            } else {
                StatusCode::new(2000)
            };
            Response::reply(key, status, Element::new(rs))
        }
        "CycleCountRq" => {
            let count: CycleCountRequest = request.typed().unwrap();
            let status = if count.location_id().get() == KNOWN_LOCATION {
                ok
            } else {
                StatusCode::new(2600)
            };
            Response::reply(key, status, Element::new(rs))
        }
        "ExecuteQueryRq" => {
            let rows = Element::new("Rows")
                .with_child(Element::new("Row").with_text("\"NUM\",\"QTY\""))
                .with_child(Element::new("Row").with_text("\"B500\",\"5\""))
                .with_child(Element::new("Row").with_text("\"B600\",\"12\""));
            Response::reply(key, ok, Element::new(rs).with_child(rows))
        }
        "InventoryQuantityRq" => {
            let info: PartQuantityRequest = request.typed().unwrap();
            if info.part_number().as_ref() != KNOWN_PART {
                return Response::reply(key, StatusCode::new(2000), Element::new(rs));
            }
            Response::reply(
                key,
                ok,
                Element::new(rs)
                    .with_child(inv_qty(1, "Stock 100", "Main", "10", "8"))
                    .with_child(inv_qty(2, "Stock 200", "Main", "4", "4"))
                    .with_child(inv_qty(7, "Annex 2", "Annex", "3", "1")),
            )
        }
        "GetTotalInventoryRq" => {
            let total: TotalInventoryRequest = request.typed().unwrap();
            Response::reply(
                key,
                ok,
                Element::new(rs)
                    .with_child(Element::new("LocationGroup").with_text(total.location_group()))
                    .with_child(Element::new("Total").with_text("14")),
            )
        }
        "FailRq" => Response::reply(key, StatusCode::new(1012), Element::new(rs)),
        _ => {
            // Echo the fields back so callers can see what arrived.
            let echo = Element::from_fields(rs, &request.fields());
            Response::reply(key, ok, echo)
        }
    }
}

fn inv_qty(id: u64, name: &str, group: &str, on_hand: &str, available: &str) -> Element {
    Element::new("InvQty")
        .with_child(Element::new("Part").with_child(Element::new("Num").with_text(KNOWN_PART)))
        .with_child(
            Element::new("Location")
                .with_child(Element::new("LocationID").with_text(id.to_string()))
                .with_child(Element::new("TypeID").with_text("10"))
                .with_child(Element::new("Name").with_text(name))
                .with_child(Element::new("Description").with_text("Shelving"))
                .with_child(Element::new("LocationGroupName").with_text(group)),
        )
        .with_child(Element::new("QtyOnHand").with_text(on_hand))
        .with_child(Element::new("QtyAvailable").with_text(available))
}
