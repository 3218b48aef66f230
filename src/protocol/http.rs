// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the vendor REST API.

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::device::ApplianceIdentity;
use crate::error::ProtocolError;
use crate::protocol::{CommandRequest, Transport};
use crate::telemetry::TelemetrySnapshot;

// ============================================================================
// HttpConfig - Connection parameters for the vendor API
// ============================================================================

/// Configuration of the vendor API client.
///
/// The id-token comes from the vendor's identity provider; obtaining it is
/// the host's job.
///
/// # Examples
///
/// ```
/// use hon_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HttpConfig::new("id-token");
///
/// // With all options
/// let config = HttpConfig::new("id-token")
///     .with_api_url("http://127.0.0.1:8080")
///     .with_timeout(Duration::from_secs(5))
///     .with_session_max_age(Duration::from_secs(3600))
///     .with_mobile_id("0123456789abcdef");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    api_url: String,
    id_token: String,
    timeout: Duration,
    session_max_age: Duration,
    mobile_id: String,
}

impl HttpConfig {
    /// Default vendor API endpoint.
    pub const DEFAULT_API_URL: &'static str = "https://api-iot.he.services";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Age after which the session is renewed before fetching telemetry.
    pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(6 * 60 * 60);
    /// Mobile app version announced to the API.
    pub const APP_VERSION: &'static str = "2.0.10";
    /// Mobile OS announced to the API.
    pub const OS: &'static str = "android";
    /// Mobile OS version announced to the API.
    pub const OS_VERSION: u32 = 31;
    /// Mobile device model announced to the API.
    pub const DEVICE_MODEL: &'static str = "exynos9820";

    /// Creates a configuration with a fresh random mobile id.
    #[must_use]
    pub fn new(id_token: impl Into<String>) -> Self {
        let mut mobile_id = uuid::Uuid::new_v4().simple().to_string();
        mobile_id.truncate(16);
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            id_token: id_token.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            session_max_age: Self::DEFAULT_SESSION_MAX_AGE,
            mobile_id,
        }
    }

    /// Sets a custom API endpoint. A trailing slash is ignored.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the session age after which the client logs in again.
    #[must_use]
    pub fn with_session_max_age(mut self, max_age: Duration) -> Self {
        self.session_max_age = max_age;
        self
    }

    /// Sets the mobile id announced to the API.
    #[must_use]
    pub fn with_mobile_id(mut self, mobile_id: impl Into<String>) -> Self {
        self.mobile_id = mobile_id.into();
        self
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the id-token.
    #[must_use]
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the session max age.
    #[must_use]
    pub fn session_max_age(&self) -> Duration {
        self.session_max_age
    }

    /// Returns the mobile id.
    #[must_use]
    pub fn mobile_id(&self) -> &str {
        &self.mobile_id
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API URL is not HTTP(S) or the HTTP client cannot
    /// be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.api_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            config: self,
            client,
            session: RwLock::new(None),
        })
    }
}

// ============================================================================
// HttpClient - Vendor API client
// ============================================================================

#[derive(Debug, Clone)]
struct Session {
    cognito_token: String,
    started: Instant,
}

/// Client for the vendor REST API.
///
/// The session is opened on first use and renewed lazily: a telemetry fetch
/// logs in again once the session is older than
/// [`HttpConfig::session_max_age`].
///
/// # Examples
///
/// ```no_run
/// use hon_lib::protocol::{HttpConfig, Transport};
///
/// # async fn example() -> hon_lib::Result<()> {
/// let client = HttpConfig::new("id-token").into_client()?;
/// client.authenticate().await?;
/// let appliances = client.fetch_appliances().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpClient {
    config: HttpConfig,
    client: Client,
    session: RwLock<Option<Session>>,
}

impl HttpClient {
    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Returns `true` once a session is open.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Builds the URL for an endpoint with query parameters.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> String {
        if query.is_empty() {
            return format!("{}{path}", self.config.api_url);
        }
        let query = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{path}?{query}", self.config.api_url)
    }

    fn device_info(&self) -> Value {
        json!({
            "mobileOs": HttpConfig::OS,
            "osVersion": HttpConfig::OS_VERSION,
            "appVersion": HttpConfig::APP_VERSION,
            "deviceModel": HttpConfig::DEVICE_MODEL,
            "mobileId": self.config.mobile_id,
        })
    }

    fn with_session_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .read()
            .as_ref()
            .map(|s| s.cognito_token.clone())
            .unwrap_or_default();
        request
            .header("Content-Type", "application/json")
            .header("cognito-token", token)
            .header("id-token", &self.config.id_token)
    }

    async fn ensure_session(&self) -> Result<(), ProtocolError> {
        if self.is_authenticated() {
            return Ok(());
        }
        self.authenticate().await
    }

    /// Logs in again when the session is older than the configured max age.
    async fn renew_session_if_expired(&self) -> Result<(), ProtocolError> {
        let expired = self
            .session
            .read()
            .as_ref()
            .is_none_or(|s| s.started.elapsed() >= self.config.session_max_age);
        if expired {
            tracing::debug!("Session expired, logging in again");
            self.authenticate().await?;
        }
        Ok(())
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProtocolError> {
        tracing::debug!(url = %url, "Sending HTTP request");
        let response = self
            .with_session_headers(self.client.get(url))
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<Value, ProtocolError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProtocolError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(ProtocolError::UnexpectedStatus(status.as_u16()));
        }
        let body = response.text().await.map_err(ProtocolError::Http)?;
        tracing::debug!(body = %body, "Received HTTP response");
        serde_json::from_str(&body).map_err(|e| ProtocolError::InvalidResponse(e.to_string()))
    }
}

fn result_code(payload: &Value) -> Option<&str> {
    payload.get("resultCode").and_then(Value::as_str)
}

impl Transport for HttpClient {
    async fn authenticate(&self) -> Result<(), ProtocolError> {
        let url = self.build_url("/auth/v1/login", &[]);
        let body = json!({
            "os": HttpConfig::OS,
            "osVersion": HttpConfig::OS_VERSION,
            "appVersion": HttpConfig::APP_VERSION,
            "deviceModel": HttpConfig::DEVICE_MODEL,
            "mobileId": self.config.mobile_id,
        });

        tracing::debug!(url = %url, "Logging in");

        let response = self
            .client
            .post(&url)
            .header("id-token", &self.config.id_token)
            .json(&body)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let data = match Self::read_json(response).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                return Err(e);
            }
        };

        let Some(token) = data
            .pointer("/cognitoUser/Token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        else {
            tracing::error!("Login response carries no session token");
            return Err(ProtocolError::AuthenticationFailed);
        };

        *self.session.write() = Some(Session {
            cognito_token: token.to_string(),
            started: Instant::now(),
        });
        Ok(())
    }

    async fn fetch_appliances(&self) -> Result<Vec<Value>, ProtocolError> {
        self.ensure_session().await?;
        let url = self.build_url("/commands/v1/appliance", &[]);
        let data = self.get_json(&url).await?;
        data.pointer("/payload/appliances")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| ProtocolError::InvalidResponse("missing payload.appliances".to_string()))
    }

    async fn fetch_capabilities(
        &self,
        appliance: &ApplianceIdentity,
    ) -> Result<Value, ProtocolError> {
        self.ensure_session().await?;
        let type_id = appliance.type_id().to_string();
        let url = self.build_url(
            "/commands/v1/retrieve",
            &[
                ("applianceType", &type_id),
                ("code", appliance.code()),
                ("applianceModelId", appliance.model_id()),
                ("firmwareId", appliance.eeprom_id()),
                ("macAddress", appliance.mac().as_str()),
                ("fwVersion", appliance.firmware_version()),
                ("os", HttpConfig::OS),
                ("appVersion", HttpConfig::APP_VERSION),
                ("series", appliance.series()),
            ],
        );
        let data = self.get_json(&url).await?;

        let mut payload = match data.get("payload") {
            Some(Value::Object(payload)) => payload.clone(),
            _ => {
                tracing::warn!(mac = %appliance.mac(), "Capabilities response has no payload");
                return Ok(Value::Object(serde_json::Map::new()));
            }
        };
        match payload.remove("resultCode") {
            Some(Value::String(code)) if code == "0" => Ok(Value::Object(payload)),
            code => {
                tracing::warn!(mac = %appliance.mac(), code = ?code, "Capabilities request refused");
                Ok(Value::Object(serde_json::Map::new()))
            }
        }
    }

    async fn fetch_telemetry(
        &self,
        appliance: &ApplianceIdentity,
    ) -> Result<TelemetrySnapshot, ProtocolError> {
        self.renew_session_if_expired().await?;
        let url = self.build_url(
            "/commands/v1/context",
            &[
                ("macAddress", appliance.mac().as_str()),
                ("applianceType", appliance.appliance_type().as_str()),
                ("category", "CYCLE"),
            ],
        );
        let data = self.get_json(&url).await?;
        let payload = data.get("payload").cloned().unwrap_or_else(|| json!({}));
        serde_json::from_value(payload).map_err(|e| ProtocolError::InvalidResponse(e.to_string()))
    }

    async fn send_command(
        &self,
        appliance: &ApplianceIdentity,
        command: &CommandRequest,
    ) -> Result<(), ProtocolError> {
        self.ensure_session().await?;
        let url = self.build_url("/commands/v1/send", &[]);
        let body = command_envelope(appliance, command, self.device_info());

        tracing::debug!(url = %url, command = %command.name(), "Sending command");

        let response = self
            .with_session_headers(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        let data = Self::read_json(response).await?;

        match data.get("payload").and_then(result_code) {
            Some("0") => Ok(()),
            _ => {
                tracing::error!(command = %command.name(), response = %data, "Command rejected");
                Err(ProtocolError::Rejected(data.to_string()))
            }
        }
    }
}

/// Builds the body of a `send` request.
fn command_envelope(
    appliance: &ApplianceIdentity,
    command: &CommandRequest,
    device: Value,
) -> Value {
    let mac = appliance.mac().as_str();
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f");

    let mut attributes = json!({
        "channel": "mobileApp",
        "origin": "standardProgram",
    });

    let mut body = json!({
        "macAddress": mac,
        "device": device,
        "ancillaryParameters": {},
        "applianceOptions": {},
        "transactionId": format!("{mac}_{timestamp}Z"),
        "commandName": command.name(),
        "parameters": command.parameters(),
    });

    if let Some(program) = command.program() {
        attributes["energyLabel"] = json!("0");
        body["programName"] = json!(format!(
            "{}.{}",
            appliance.appliance_type().program_prefix(),
            program.to_uppercase()
        ));
    }
    body["attributes"] = attributes;
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApplianceType;

    fn client() -> HttpClient {
        HttpConfig::new("token")
            .with_api_url("http://127.0.0.1:9/")
            .with_mobile_id("abcdef0123456789")
            .into_client()
            .unwrap()
    }

    #[test]
    fn build_url_encodes_query() {
        let url = client().build_url("/commands/v1/context", &[("macAddress", "aa:bb"), ("category", "CYCLE")]);
        assert_eq!(
            url,
            "http://127.0.0.1:9/commands/v1/context?macAddress=aa%3Abb&category=CYCLE"
        );
    }

    #[test]
    fn build_url_without_query() {
        assert_eq!(client().build_url("/auth/v1/login", &[]), "http://127.0.0.1:9/auth/v1/login");
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let result = HttpConfig::new("token").with_api_url("ftp://x").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn config_defaults() {
        let config = HttpConfig::new("token");
        assert_eq!(config.api_url(), "https://api-iot.he.services");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.session_max_age(), Duration::from_secs(21_600));
        assert_eq!(config.mobile_id().len(), 16);
        assert!(config.mobile_id().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn new_client_has_no_session() {
        assert!(!client().is_authenticated());
    }

    #[test]
    fn start_envelope_names_the_program() {
        let washer = ApplianceIdentity::new("aa-bb", ApplianceType::WashingMachine);
        let mut values = std::collections::BTreeMap::new();
        values.insert("temp".to_string(), "40".to_string());
        let body = command_envelope(
            &washer,
            &CommandRequest::start("cotton", values),
            json!({ "mobileId": "x" }),
        );

        assert_eq!(body["programName"], "PROGRAMS.WM_WD.COTTON");
        assert_eq!(body["attributes"]["energyLabel"], "0");
        assert_eq!(body["attributes"]["channel"], "mobileApp");
        assert_eq!(body["parameters"]["temp"], "40");
        assert_eq!(body["commandName"], "startProgram");
        let tx = body["transactionId"].as_str().unwrap();
        assert!(tx.starts_with("aa-bb_"));
        assert!(tx.ends_with('Z'));
    }

    #[test]
    fn plain_envelope_has_no_program() {
        let dryer = ApplianceIdentity::new("aa-bb", ApplianceType::TumbleDryer);
        let body = command_envelope(&dryer, &CommandRequest::stop(), json!({}));
        assert!(body.get("programName").is_none());
        assert!(body["attributes"].get("energyLabel").is_none());
        assert_eq!(body["parameters"]["onOffStatus"], "0");
    }
}
