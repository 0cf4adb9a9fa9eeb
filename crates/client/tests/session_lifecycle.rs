mod common;

use std::time::Duration;

use common::{MockServer, Mode, SESSION_KEY, dead_address};
use fishbowl_client::{ClientConfig, ConnectionError, Error, FishbowlClient};
use fishbowl_core::StatusCode;

#[test]
fn connect_then_close_releases_the_socket() {
    fishbowl_observability::init_test();
    let server = MockServer::spawn();

    let mut client = FishbowlClient::new();
    client.connect(&server.admin()).unwrap();
    assert!(client.is_connected());

    client.close();
    assert!(!client.is_connected());
    assert!(server.wait_for_closed(1), "server never saw the socket close");
    assert_eq!(server.requests(), vec!["LoginRq", "LogoutRq"]);
}

#[test]
fn close_is_idempotent() {
    let server = MockServer::spawn();
    let mut client = FishbowlClient::new();
    client.close();

    client.connect(&server.admin()).unwrap();
    client.close();
    client.close();

    assert!(server.wait_for_closed(1));
    let logouts = server.requests().iter().filter(|r| *r == "LogoutRq").count();
    assert_eq!(logouts, 1);
}

#[test]
fn dropping_a_connected_client_logs_out() {
    let server = MockServer::spawn();
    {
        let mut client = FishbowlClient::new();
        client.connect(&server.admin()).unwrap();
    }
    assert!(server.wait_for_closed(1));
    assert!(server.requests().contains(&"LogoutRq".to_string()));
}

#[test]
fn bad_credentials_are_rejected_and_the_socket_is_released() {
    let server = MockServer::spawn();
    let mut client = FishbowlClient::new();

    let err = client.connect(&server.config("admin", "wrong")).unwrap_err();
    match err {
        Error::Connection(ConnectionError::Rejected(remote)) => {
            assert_eq!(remote.status, StatusCode::new(1120));
            assert_eq!(remote.message, "Invalid username or password.");
        }
        other => panic!("expected a rejected login, got {other:?}"),
    }
    assert!(!client.is_connected());
    assert!(server.wait_for_closed(1));
}

#[test]
fn unreachable_server_fails_fast_with_a_connection_error() {
    let addr = dead_address();
    let config = ClientConfig::new("admin", "admin", addr.ip().to_string())
        .with_port(addr.port())
        .with_connect_timeout(Duration::from_millis(500));

    let mut client = FishbowlClient::new();
    let err = client.connect(&config).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Connection(ConnectionError::Unreachable { .. } | ConnectionError::Timeout { .. })
        ),
        "unexpected error: {err:?}"
    );
    assert!(!client.is_connected());
}

#[test]
fn invalid_config_is_refused_before_dialing() {
    let server = MockServer::spawn();
    let config = server.config("", "admin");

    let mut client = FishbowlClient::new();
    let err = client.connect(&config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "unexpected error: {err:?}");
    assert_eq!(server.accepted(), 0);
}

#[test]
fn reconnecting_closes_the_previous_session() {
    let server = MockServer::spawn();
    let mut client = FishbowlClient::new();

    client.connect(&server.admin()).unwrap();
    client.connect(&server.admin()).unwrap();
    assert!(client.is_connected());
    assert!(server.wait_for_closed(1));

    client.close();
    assert!(server.wait_for_closed(2));
    assert_eq!(
        server.requests(),
        vec!["LoginRq", "LogoutRq", "LoginRq", "LogoutRq"]
    );
}

#[test]
fn with_session_closes_even_when_the_body_fails() {
    let server = MockServer::spawn();

    let err = FishbowlClient::with_session(&server.admin(), |client| {
        client.add_inventory("NOPE", 1, 1, 0, 1)
    })
    .unwrap_err();
    assert!(matches!(err, Error::Remote(_)));
    assert!(server.wait_for_closed(1));
    assert_eq!(server.requests().last().map(String::as_str), Some("LogoutRq"));
}

#[test]
fn session_key_comes_from_the_login_ticket() {
    let server = MockServer::spawn();
    let echoed = FishbowlClient::with_session(&server.admin(), |client| {
        client.send_request("PingRq", &fishbowl_core::Fields::new().with("Key", SESSION_KEY))
    })
    .unwrap();
    // Requests with a bad ticket get status 1130 instead of an echo.
    assert_eq!(echoed.name, "PingRs");
    assert_eq!(echoed.fields().get("Key"), Some(SESSION_KEY));
}

#[test]
fn login_without_a_ticket_key_is_refused() {
    let server = MockServer::spawn_with(Mode::KeylessLogin);
    let mut client = FishbowlClient::new();

    let err = client.connect(&server.admin()).unwrap_err();
    assert!(
        matches!(err, Error::Connection(ConnectionError::MissingKey)),
        "unexpected error: {err:?}"
    );
    assert!(!client.is_connected());
    assert!(server.wait_for_closed(1));
    assert_eq!(server.requests(), vec!["LoginRq"]);
}

#[test]
fn refused_logout_still_releases_the_socket() {
    let server = MockServer::spawn_with(Mode::RefuseLogout);
    let mut client = FishbowlClient::new();
    client.connect(&server.admin()).unwrap();

    client.close();
    assert!(!client.is_connected());
    assert!(server.wait_for_closed(1));
    assert_eq!(server.requests(), vec!["LoginRq", "LogoutRq"]);

    client.close();
}
