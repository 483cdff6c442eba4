//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult, SeatingApi};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::{
    EventSeating, Guest, SeatAssignment, SeatAssignmentRequest, TableCustomization,
    TableCustomizationUpdate,
};

/// HTTP client for making network requests to the seating API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => request.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", t)),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.patch(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response and unwrap the `ApiResponse` envelope
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .map(|r| r.message)
                .unwrap_or(text);
            tracing::debug!(status = %status, message = %message, "Seating API rejected request");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(message))
                }
                _ => Err(ClientError::Internal(message)),
            };
        }

        let envelope: ApiResponse<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing data: {}", envelope.message)))
    }
}

// ========== Seating API ==========

#[async_trait]
impl SeatingApi for HttpClient {
    async fn fetch_event_seating(&self, event_id: i64) -> ClientResult<EventSeating> {
        self.get(&format!("/api/events/{}/seating", event_id)).await
    }

    async fn fetch_guests(&self, event_id: i64) -> ClientResult<Vec<Guest>> {
        self.get(&format!("/api/events/{}/seating/guests", event_id))
            .await
    }

    async fn fetch_table_customizations(
        &self,
        event_id: i64,
    ) -> ClientResult<Vec<TableCustomization>> {
        self.get(&format!("/api/events/{}/tables", event_id)).await
    }

    async fn assign_guest(
        &self,
        event_id: i64,
        guest_id: i64,
        table_number: Option<u32>,
    ) -> ClientResult<SeatAssignment> {
        self.patch(
            &format!("/api/events/{}/seating/guests/{}", event_id, guest_id),
            &SeatAssignmentRequest { table_number },
        )
        .await
    }

    async fn update_table_customization(
        &self,
        event_id: i64,
        table_number: u32,
        update: &TableCustomizationUpdate,
    ) -> ClientResult<TableCustomization> {
        self.patch(
            &format!("/api/events/{}/tables/{}", event_id, table_number),
            update,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(
            client.url("/api/events/1/tables"),
            "http://localhost:8080/api/events/1/tables"
        );
        assert_eq!(client.url("api/x"), "http://localhost:8080/api/x");
    }

    #[test]
    fn test_token() {
        let client = HttpClient::new(&ClientConfig::default()).unwrap();
        assert!(client.token().is_none());
        let client = client.with_token("t0k");
        assert_eq!(client.token(), Some("t0k"));
    }
}
