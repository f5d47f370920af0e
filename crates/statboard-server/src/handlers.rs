//! HTTP handlers for the dashboard endpoints

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use tracing::{error, info};

use crate::render;
use crate::state::AppState;

/// `GET /` - polite brush-off for anything that is not the dashboard.
pub async fn root(uri: axum::http::Uri) -> String {
    format!(
        "Hello, {:?}. This service is for a dashboard, not you!",
        uri.path()
    )
}

/// `GET /data` - the dashboard payload in the tabular wire format.
///
/// Responds 500 when no forecast has been fetched yet or when encoding
/// fails; a failed encode never transmits partial bytes because the
/// session is rendered into a buffer and checked first.
pub async fn data(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    info!("handling data request from {}", origin(addr, forwarded));

    let snapshot = state.latest.read().await.clone();
    let Some(snapshot) = snapshot else {
        error!("no forecast snapshot available yet");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error getting the forecast\n",
        )
            .into_response();
    };

    match render::render_data(&snapshot, Local::now(), state.refresh_secs) {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain")], body).into_response(),
        Err(err) => {
            error!(%err, "error writing out the forecast");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error writing the forecast\n",
            )
                .into_response()
        }
    }
}

/// Describe where a request came from, including the proxy chain when a
/// reverse proxy forwarded it.
fn origin(addr: SocketAddr, forwarded: Option<&str>) -> String {
    match forwarded {
        Some(chain) => format!("{addr}, X-Forwarded-For={chain}"),
        None => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_without_proxy() {
        let addr: SocketAddr = "10.0.0.7:51234".parse().unwrap();
        assert_eq!(origin(addr, None), "10.0.0.7:51234");
    }

    #[test]
    fn test_origin_with_forwarded_chain() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(
            origin(addr, Some("203.0.113.9, 198.51.100.2")),
            "127.0.0.1:9000, X-Forwarded-For=203.0.113.9, 198.51.100.2"
        );
    }
}
