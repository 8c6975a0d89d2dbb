//! OAuth client-credentials handling.
//!
//! Tokens are fetched lazily on the first call that needs one and reused
//! from the client's [`TokenCache`] until the safety margin before expiry.
//! A failed fetch is returned immediately; nothing is retried.

use std::sync::Arc;

use carrier_telemetry::{record_call, send_checked, CallOutcome, TOKEN_FETCHES};
use shared_types::{
    Carrier, CarrierOperation, HttpRequest, HttpTransport, SecretString, ShippingError,
    TimeSource, TokenCache,
};
use tracing::{debug, info, warn};

use crate::config::DhlConfig;
use crate::domain::TokenResponse;

/// Lifetime assumed when the token response omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 300;

/// Longest token lifetime honoured, in seconds.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Build the token request.
pub fn token_request(config: &DhlConfig) -> Result<HttpRequest, ShippingError> {
    let body = serde_urlencoded::to_string(&[
        ("grant_type", "client_credentials"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.expose()),
    ])
    .map_err(|e| ShippingError::Serialization(e.to_string()))?;

    Ok(HttpRequest::post(config.token_url())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .body(body))
}

/// Extract the token and its lifetime in seconds.
pub fn parse_token_response(body: &str) -> Result<(SecretString, i64), ShippingError> {
    let invalid = || ShippingError::InvalidAuthResponse {
        carrier: Carrier::Dhl,
    };

    let parsed: TokenResponse = serde_json::from_str(body).map_err(|_| invalid())?;
    let token = parsed
        .access_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(invalid)?;

    if let Some(kind) = parsed.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            warn!(token_type = kind, "DHL returned a non-bearer token type");
        }
    }

    let lifetime = parsed
        .expires_in
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    if lifetime > MAX_TOKEN_LIFETIME_SECS {
        warn!(expires_in = lifetime, "DHL token lifetime capped");
    }

    Ok((SecretString::new(token), lifetime.min(MAX_TOKEN_LIFETIME_SECS)))
}

/// Token provider owned by one DHL client.
pub struct DhlAuthenticator {
    tokens: Arc<TokenCache>,
    clock: Arc<dyn TimeSource>,
}

impl DhlAuthenticator {
    /// Authenticator over an explicit cache and clock.
    pub fn new(tokens: Arc<TokenCache>, clock: Arc<dyn TimeSource>) -> Self {
        Self { tokens, clock }
    }

    /// Cache backing this authenticator.
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Clock backing this authenticator.
    pub fn clock(&self) -> &Arc<dyn TimeSource> {
        &self.clock
    }

    /// A bearer token, from cache or freshly fetched.
    pub async fn bearer_token(
        &self,
        config: &DhlConfig,
        transport: &dyn HttpTransport,
    ) -> Result<SecretString, ShippingError> {
        let requested_at = self.clock.now();
        if let Some(token) = self.tokens.get(Carrier::Dhl, requested_at) {
            debug!("Reusing cached DHL token");
            return Ok(token);
        }

        TOKEN_FETCHES.with_label_values(&[Carrier::Dhl.as_str()]).inc();
        let request = token_request(config)?;
        let response = send_checked(
            transport,
            Carrier::Dhl,
            CarrierOperation::Authentication,
            request,
        )
        .await?;

        let (token, lifetime) = match parse_token_response(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                record_call(
                    Carrier::Dhl,
                    CarrierOperation::Authentication,
                    CallOutcome::InvalidResponse,
                );
                return Err(e);
            }
        };

        // Lifetime counts from before the request went out.
        let expires_at = self
            .tokens
            .store(Carrier::Dhl, token.clone(), lifetime, requested_at)?;
        record_call(
            Carrier::Dhl,
            CarrierOperation::Authentication,
            CallOutcome::Success,
        );
        info!(expires_at = %expires_at, "DHL token refreshed");

        Ok(token)
    }
}
