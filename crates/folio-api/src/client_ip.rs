//! Extractor for the address a request came from.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::request::Parts,
};

/// The sender's address: the first `X-Forwarded-For` hop when present,
/// otherwise the TCP peer, otherwise `"unknown"`.
///
/// The peer is only available when the server is run with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let forwarded = parts
      .headers
      .get("x-forwarded-for")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(str::trim)
      .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
      return Ok(ClientIp(ip.to_owned()));
    }

    let peer = parts
      .extensions
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| addr.ip().to_string());

    Ok(ClientIp(peer.unwrap_or_else(|| "unknown".to_owned())))
  }
}
