//! Skip guard for wiremock-backed tests in sandboxes without loopback sockets.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "ICON_AUDIT_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Returns true (after logging why) when no localhost socket can be bound.
///
/// Panics instead when `ICON_AUDIT_REQUIRE_SOCKET_TESTS` is set, so CI never
/// silently skips.
#[track_caller]
#[must_use]
pub fn loopback_unavailable() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost at {}:{}",
        location.file(),
        location.line()
    );
    assert!(!sockets_required(), "{message}; unset {REQUIRE_ENV} to allow skipping");
    eprintln!("{message}; skipping");
    true
}

/// Starts a mock server, or returns `None` when loopback is unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if loopback_unavailable() {
        None
    } else {
        Some(MockServer::start().await)
    }
}
