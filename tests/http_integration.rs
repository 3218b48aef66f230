// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport using wiremock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use hon_lib::device::ApplianceIdentity;
use hon_lib::protocol::{CommandRequest, HttpClient, HttpConfig, Transport};
use hon_lib::settings::MemoryStore;
use hon_lib::types::{ApplianceType, MacAddress, MachineMode};
use hon_lib::{Connection, ConnectionConfig, ProtocolError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAC: &str = "aa-bb-cc-dd-ee-ff";

fn client(server: &MockServer) -> HttpClient {
    HttpConfig::new("id-token")
        .with_api_url(server.uri())
        .with_mobile_id("0123456789abcdef")
        .into_client()
        .unwrap()
}

fn washer() -> ApplianceIdentity {
    ApplianceIdentity::new(MAC, ApplianceType::WashingMachine)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/login"))
        .and(header("id-token", "id-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cognitoUser": { "Token": "session-token" }
        })))
        .mount(server)
        .await;
}

fn context_body() -> serde_json::Value {
    json!({
        "payload": {
            "shadow": {
                "parameters": {
                    "machMode": { "parNewVal": "2" },
                    "remoteCtrValid": { "parNewVal": "1" },
                    "remainingTimeMM": { "parNewVal": 42 }
                }
            },
            "lastConnEvent": { "category": "CONNECTED" }
        }
    })
}

// ============================================================================
// Session
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn login_opens_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/login"))
            .and(body_partial_json(json!({ "os": "android", "mobileId": "0123456789abcdef" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cognitoUser": { "Token": "session-token" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(!client.is_authenticated());
        client.authenticate().await.unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cognitoUser": {} })))
            .mount(&server)
            .await;

        let err = client(&server).authenticate().await.unwrap_err();
        assert!(matches!(err, ProtocolError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.authenticate().await.unwrap_err();
        assert!(matches!(err, ProtocolError::AuthenticationFailed));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn server_error_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).authenticate().await.unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedStatus(500)));
    }

    #[tokio::test]
    async fn expired_session_logs_in_again() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cognitoUser": { "Token": "session-token" }
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(context_body()))
            .mount(&server)
            .await;

        let client = HttpConfig::new("id-token")
            .with_api_url(server.uri())
            .with_session_max_age(Duration::ZERO)
            .into_client()
            .unwrap();

        client.authenticate().await.unwrap();
        client.fetch_telemetry(&washer()).await.unwrap();
    }
}

// ============================================================================
// Reads
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn appliance_directory() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/appliance"))
            .and(header("cognito-token", "session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": {
                    "appliances": [
                        { "macAddress": MAC, "applianceTypeId": 1, "applianceTypeName": "WM" },
                        { "macAddress": "11-22", "applianceTypeId": 4, "applianceTypeName": "OV" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let entries = client(&server).fetch_appliances().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["macAddress"], MAC);
    }

    #[tokio::test]
    async fn directory_without_payload_is_invalid() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/appliance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client(&server).fetch_appliances().await.unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn capabilities_strip_result_code() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/retrieve"))
            .and(query_param("macAddress", MAC))
            .and(query_param("applianceType", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": {
                    "resultCode": "0",
                    "startProgram": { "PROGRAMS.WM_WD.COTTON": { "parameters": {} } }
                }
            })))
            .mount(&server)
            .await;

        let metadata = client(&server).fetch_capabilities(&washer()).await.unwrap();
        assert!(metadata.get("resultCode").is_none());
        assert!(metadata["startProgram"]["PROGRAMS.WM_WD.COTTON"].is_object());
    }

    #[tokio::test]
    async fn refused_capabilities_are_empty() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/retrieve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": { "resultCode": "1", "startProgram": {} }
            })))
            .mount(&server)
            .await;

        let metadata = client(&server).fetch_capabilities(&washer()).await.unwrap();
        assert_eq!(metadata, json!({}));
    }

    #[tokio::test]
    async fn telemetry_snapshot() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/context"))
            .and(query_param("macAddress", MAC))
            .and(query_param("category", "CYCLE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(context_body()))
            .mount(&server)
            .await;

        let snapshot = client(&server).fetch_telemetry(&washer()).await.unwrap();
        assert_eq!(snapshot.connection_category(), Some("CONNECTED"));
        let change = snapshot.to_state_change();
        assert_eq!(change.value_of("machMode"), Some("2"));
        assert_eq!(change.value_of("remainingTimeMM"), Some("42"));
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn start_envelope() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/commands/v1/send"))
            .and(body_partial_json(json!({
                "macAddress": MAC,
                "commandName": "startProgram",
                "programName": "PROGRAMS.WM_WD.COTTON",
                "parameters": { "temp": "40" },
                "attributes": { "channel": "mobileApp", "energyLabel": "0" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": { "resultCode": "0" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let parameters = BTreeMap::from([("temp".to_string(), "40".to_string())]);
        let command = CommandRequest::start("cotton", parameters);
        client(&server).send_command(&washer(), &command).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_command() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/commands/v1/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": { "resultCode": "3" }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_command(&washer(), &CommandRequest::stop())
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Rejected(_)));
    }
}

// ============================================================================
// End to end
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn connect_poll_and_pause() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/appliance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": {
                    "appliances": [
                        { "macAddress": MAC, "applianceTypeId": 1, "applianceTypeName": "WM" }
                    ]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/retrieve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": {
                    "resultCode": "0",
                    "startProgram": {
                        "PROGRAMS.WM_WD.COTTON": {
                            "parameters": {
                                "temp": { "typology": "enum", "enumValues": ["20", "40"], "defaultValue": "40" }
                            }
                        }
                    }
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commands/v1/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(context_body()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/commands/v1/send"))
            .and(body_partial_json(json!({
                "commandName": "pauseProgram",
                "parameters": { "pause": "1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payload": { "resultCode": "0" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let connection = Connection::new(
            client(&server),
            Arc::new(MemoryStore::new()),
            ConnectionConfig::default(),
        );
        assert_eq!(connection.connect().await.unwrap(), 1);
        assert_eq!(connection.poll().await, 1);

        let washer = connection.appliance(&MacAddress::new(MAC)).await.unwrap();
        let mut washer = washer.lock().await;
        assert_eq!(washer.current_program_name(), Some("cotton"));
        assert!(washer.is_on());
        assert!(washer.is_running());

        assert!(washer.send_pause_resume().await);
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Paused));
    }
}
