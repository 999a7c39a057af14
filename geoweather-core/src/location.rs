use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{error::LocationError, model::Coordinates};

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// One-shot source of the user's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Always resolves to the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Stand-in for hosts without any positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl LocationProvider for Unsupported {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Locates the machine from its public IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocation {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_GEOLOCATION_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpLocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        tracing::debug!(url = %self.url, "requesting position fix");

        let res = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::warn!(error = %e, "geolocation request failed");
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Other(Some(e.to_string()))
            }
        })?;

        let status = res.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(LocationError::from_platform(Some(1), None));
        }
        if !status.is_success() {
            tracing::warn!(%status, "geolocation endpoint returned an error status");
            return Err(LocationError::from_platform(Some(2), None));
        }

        let body: IpApiResponse = res.json().await.map_err(|e| {
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::PositionUnavailable
            }
        })?;

        if body.status.as_deref() == Some("fail") {
            let message = body.message.unwrap_or_default();
            tracing::warn!(%message, "geolocation lookup failed");
            let code = if message.contains("denied") { 1 } else { 2 };
            return Err(LocationError::from_platform(Some(code), Some(message)));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    async fn server_returning(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn fixed_location_resolves_immediately() {
        let coords = Coordinates::new(37.5, 127.0);
        assert_eq!(FixedLocation(coords).current_location().await, Ok(coords));
    }

    #[tokio::test]
    async fn unsupported_rejects() {
        assert_eq!(
            Unsupported.current_location().await,
            Err(LocationError::Unsupported)
        );
    }

    #[tokio::test]
    async fn ip_location_parses_coordinates() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "lat": 37.5665,
            "lon": 126.978
        })))
        .await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let coords = provider.current_location().await.expect("position fix");

        assert_eq!(coords, Coordinates::new(37.5665, 126.978));
    }

    #[tokio::test]
    async fn ip_location_failure_maps_to_unavailable() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = provider.current_location().await.unwrap_err();

        assert_eq!(err, LocationError::PositionUnavailable);
    }

    #[tokio::test]
    async fn ip_location_forbidden_maps_to_denied() {
        let server = server_returning(ResponseTemplate::new(403)).await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = provider.current_location().await.unwrap_err();

        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn ip_location_missing_coordinates_is_unavailable() {
        let server = server_returning(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })),
        )
        .await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        assert_eq!(
            provider.current_location().await,
            Err(LocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn ip_location_denied_message_maps_to_denied() {
        let server = server_returning(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "access denied"
        })))
        .await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = provider.current_location().await.unwrap_err();

        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn ip_location_server_error_maps_to_unavailable() {
        let server = server_returning(ResponseTemplate::new(500)).await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = provider.current_location().await.unwrap_err();

        assert_eq!(err, LocationError::PositionUnavailable);
    }

    #[tokio::test]
    async fn ip_location_non_json_body_maps_to_unavailable() {
        let server = server_returning(
            ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"),
        )
        .await;

        let provider = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = provider.current_location().await.unwrap_err();

        assert_eq!(err, LocationError::PositionUnavailable);
    }

    #[tokio::test]
    async fn ip_location_connection_refused_keeps_transport_message() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/json");

        let err = IpLocation::with_url(url).current_location().await.unwrap_err();

        match err {
            LocationError::Other(Some(message)) => assert!(!message.is_empty()),
            other => panic!("expected an unclassified error, got {other:?}"),
        }
    }
}
