//! Extract the rate-limit partition key (client IP) from the request.

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::SocketAddr;

/// Partition used when the peer address is not known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Remote IP of the connection as a string, or [`UNKNOWN_CLIENT`] when the server
/// was not started with connect info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
        Ok(ClientIp(ip))
    }
}
