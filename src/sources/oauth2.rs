use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::cache::token::AccessToken;
use crate::config::settings::ProviderSettings;
use crate::error::TokenError;
use crate::utils::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, TSG_SCOPE_PREFIX};

/// Client id/secret pair scoped to one tenant service group.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
    tenant_id: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let credentials = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
        };
        for (field, value) in [
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
            ("tenant_id", &credentials.tenant_id),
        ] {
            if value.trim().is_empty() {
                return Err(TokenError::InvalidCredentials(format!("{field} must not be empty")));
            }
        }
        Ok(credentials)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// `tsg_id:<tenant_id>`
    pub fn scope(&self) -> String {
        format!("{}{}", TSG_SCOPE_PREFIX, self.tenant_id)
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Successful token endpoint response. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    /// lifetime in seconds
    pub expires_in: u64,
}

/// The client-credentials token endpoint.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub url: String,
    pub client: Client,
}

impl OAuth2Source {
    pub fn new(settings: &ProviderSettings) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()?;
        Ok(Self::with_client(settings.token_url.clone(), client))
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self { url: url.into(), client }
    }

    /// One POST, no retries.
    pub async fn fetch_token(&self, credentials: &ClientCredentials) -> Result<TokenResponse, TokenError> {
        let scope = credentials.scope();
        let form = [("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS), ("scope", scope.as_str())];

        debug!("requesting token for client '{}' from '{}'", credentials.client_id, self.url);
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TokenError::Auth {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<TokenResponse>(&body)
            .map_err(|err| TokenError::InvalidResponse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use httpmock::prelude::*;
    use serde_json::json;

    fn source(server: &MockServer) -> OAuth2Source {
        let settings = ProviderSettings::default().with_token_url(server.url("/oauth2/access_token"));
        OAuth2Source::new(&settings).unwrap()
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("client-id", "client-secret", "1234567890").unwrap()
    }

    #[test]
    fn scope_carries_tenant_id() {
        assert_eq!(credentials().scope(), "tsg_id:1234567890");
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let err = ClientCredentials::new("", "secret", "tsg").unwrap_err();
        assert!(matches!(err, TokenError::InvalidCredentials(ref m) if m.contains("client_id")));
        assert!(ClientCredentials::new("id", " ", "tsg").is_err());
        assert!(ClientCredentials::new("id", "secret", "").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        assert!(!format!("{:?}", credentials()).contains("client-secret"));
    }

    #[tokio::test]
    async fn posts_form_with_basic_auth() {
        let server = MockServer::start_async().await;
        let expected_auth = format!(
            "Basic {}",
            general_purpose::STANDARD.encode("client-id:client-secret")
        );
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth2/access_token")
                    .header("authorization", &expected_auth)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body_includes("grant_type=client_credentials")
                    .body_includes("scope=tsg_id%3A1234567890");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "access_token": "tok-123",
                        "expires_in": 899,
                        "token_type": "Bearer",
                        "scope": "tsg_id:1234567890"
                    }));
            })
            .await;

        let response = source(&server).fetch_token(&credentials()).await.unwrap();
        assert_eq!(response.access_token.as_str(), "tok-123");
        assert_eq!(response.expires_in, 899);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_is_auth_error_with_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(401).body("ignored");
            })
            .await;

        let err = source(&server).fetch_token(&credentials()).await.unwrap_err();
        match err {
            TokenError::Auth { status, reason } => {
                assert_eq!(status, 401);
                assert_eq!(reason, "Unauthorized");
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_success_codes_are_still_auth_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(201).json_body(json!({"access_token": "tok", "expires_in": 10}));
            })
            .await;

        let err = source(&server).fetch_token(&credentials()).await.unwrap_err();
        assert!(matches!(err, TokenError::Auth { status: 201, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(json!({"access_token": "tok"}));
            })
            .await;

        let err = source(&server).fetch_token(&credentials()).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_endpoint_hits_request_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({"access_token": "tok", "expires_in": 10}));
            })
            .await;

        let mut settings = ProviderSettings::default().with_token_url(server.url("/oauth2/access_token"));
        settings.request_timeout_seconds = 1;
        let err = OAuth2Source::new(&settings)
            .unwrap()
            .fetch_token(&credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Transport(ref e) if e.is_timeout()), "got {err:?}");
    }
}
