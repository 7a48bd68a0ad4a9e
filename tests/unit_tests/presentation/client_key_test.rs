use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;

use todo_agent::presentation::middleware::client_key;

fn from_peer(peer: &str, forwarded: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder();
    if let Some(chain) = forwarded {
        builder = builder.header("x-forwarded-for", chain);
    }
    let mut request = builder.body(Body::empty()).unwrap();
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[test]
fn given_trusted_forwarded_chain_when_keying_then_uses_first_hop() {
    let request = from_peer("10.0.0.1:443", Some("203.0.113.7, 10.0.0.1"));

    assert_eq!(client_key(&request, true), "203.0.113.7");
}

#[test]
fn given_untrusted_forwarded_header_when_keying_then_uses_peer_ip() {
    let request = from_peer("192.0.2.10:51234", Some("203.0.113.7"));

    assert_eq!(client_key(&request, false), "192.0.2.10");
}

#[test]
fn given_trusted_but_blank_forwarded_header_when_keying_then_uses_peer_ip() {
    let request = from_peer("192.0.2.10:51234", Some(" "));

    assert_eq!(client_key(&request, true), "192.0.2.10");
}

#[test]
fn given_no_client_information_when_keying_then_falls_back_to_unknown() {
    let request = Request::builder().body(Body::empty()).unwrap();
    assert_eq!(client_key(&request, true), "unknown");
}
