//! Tests for the soundscape service client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real service connection.

use soundscape_catalog::{CatalogError, CatalogSource};
use soundscape_client::{ClientConfig, ClientError, ServiceClient, Session};
use soundscape_core::SoundType;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}/frontend-api", server.uri())).with_endpoints(
        format!("{}/config/", server.uri()),
        format!("{}/account/remote-control-links/", server.uri()),
    )
}

async fn client_with_session(server: &MockServer) -> ServiceClient {
    let client = ServiceClient::new(config_for(server)).unwrap();
    client
        .set_session(Session {
            token: "session-token".to_string(),
            session_id: "s-1".to_string(),
        })
        .await;
    client
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_address_rejected() {
        let result = ServiceClient::new(ClientConfig::new(""));

        match result {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_address_without_scheme_rejected() {
        let result = ServiceClient::new(ClientConfig::new("syrinscape.com/online"));

        match result {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_multiple_trailing_slashes_removed() {
        let client = ServiceClient::new(ClientConfig::new("https://example.com/api///")).unwrap();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let address = rt.block_on(client.address());
        assert_eq!(address, "https://example.com/api");
    }
}

// =============================================================================
// Session Tests
// =============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn test_authenticate_stores_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config/"))
            .and(header("Authorization", "user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "session-token",
                "session_id": 8812
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            ServiceClient::new(config_for(&mock_server).with_auth_token("user-token")).unwrap();
        assert!(!client.is_authenticated().await);

        let session = client.authenticate().await.unwrap();
        assert_eq!(session.token, "session-token");
        assert_eq!(session.session_id, "8812");
        assert!(client.is_authenticated().await);

        // Already open: no second request
        client.ensure_session().await.unwrap();
    }

    #[tokio::test]
    async fn test_authenticate_without_token() {
        let mock_server = MockServer::start().await;
        let client = ServiceClient::new(config_for(&mock_server)).unwrap();

        match client.authenticate().await {
            Err(ClientError::AuthRequired) => {}
            other => panic!("Expected AuthRequired, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config/"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad token"))
            .mount(&mock_server)
            .await;

        let client =
            ServiceClient::new(config_for(&mock_server).with_auth_token("stale")).unwrap();

        match client.authenticate().await {
            Err(ClientError::AuthFailed(_)) => {}
            other => panic!("Expected AuthFailed, got: {:?}", other),
        }
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_changing_token_closes_session() {
        let mock_server = MockServer::start().await;
        let client = client_with_session(&mock_server).await;

        client.set_auth_token(Some("other".to_string())).await;
        assert!(client.session().await.is_none());
    }
}

// =============================================================================
// Listing Tests
// =============================================================================

mod listings {
    use super::*;

    #[tokio::test]
    async fn test_fetch_requires_session() {
        let mock_server = MockServer::start().await;
        let client = ServiceClient::new(config_for(&mock_server)).unwrap();

        let result = client.soundsets().await;
        assert!(matches!(result, Err(ClientError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_soundsets_sends_session_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/soundsets/"))
            .and(header("authorization", "token session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "Tavern", "url": "https://example.com/s/1", "uuid": "u-1"},
                {"id": 2, "name": "Forest", "uuid": "u-2"}
            ])))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let sets = client.soundsets().await.unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].uuid, "u-2");
        assert!(sets[1].url.is_none());
    }

    #[tokio::test]
    async fn test_moods_query_by_soundset() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/moods/"))
            .and(query_param("soundset_uuid", "u-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"pk": 77, "name": "Brawl", "soundset": "u-1"}
            ])))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let moods = client.moods("u-1").await.unwrap();

        assert_eq!(moods[0].id, 77);
        assert!(moods[0].extra.contains_key("soundset"));
    }

    #[tokio::test]
    async fn test_soundset_uuid_is_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/moods/"))
            .and(query_param("soundset_uuid", "a b&page=2"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"pk": 78, "name": "Odd"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let moods = client.moods("a b&page=2").await.unwrap();

        assert_eq!(moods[0].id, 78);
    }

    #[tokio::test]
    async fn test_elements_failure_yields_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/elements/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        assert!(client.elements("u-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_elements_mapped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/elements/"))
            .and(query_param("soundset__uuid", "u-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "pk": 5,
                "soundset_name": "Tavern",
                "soundset": "https://example.com/s/1",
                "name": "Door",
                "url": "https://example.com/e/5"
            }])))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let elements = client.elements("u-1").await;

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].soundset_name.as_deref(), Some("Tavern"));
    }
}

// =============================================================================
// Bulk Data Tests
// =============================================================================

mod bulk {
    use super::*;

    #[tokio::test]
    async fn test_bulk_data_opens_session_first() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "fresh", "session_id": "s-9"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/account/remote-control-links/"))
            .and(header("authorization", "token fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "m:1", "type": "mood", "name": "Brawl", "soundset_name": "Tavern",
                 "product_or_pack": "CoreSet"},
                {"id": 3, "type": "element", "name": "Door", "sub_type": "oneshot"}
            ])))
            .mount(&mock_server)
            .await;

        let client =
            ServiceClient::new(config_for(&mock_server).with_auth_token("user-token")).unwrap();
        let rows = client.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].soundset_name.as_deref(), Some("Tavern"));
        assert_eq!(rows[1].id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_bulk_failure_is_a_source_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/account/remote-control-links/"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let err = client.fetch_rows().await.unwrap_err();
        assert!(matches!(err, CatalogError::Source(msg) if msg.contains("502")));
    }
}

// =============================================================================
// Command Tests
// =============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn test_play_strips_prefix() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/moods/1234/play/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let response = client
            .play("m:1234".parse().unwrap(), SoundType::Element)
            .await
            .unwrap();
        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_stop_uses_default_kind_for_bare_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/elements/55/stop/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        client.stop(55.into(), SoundType::Element).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_is_auth_required() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/moods/1/play/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let result = client.play(1.into(), SoundType::Mood).await;
        assert!(matches!(result, Err(ClientError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_malformed_response_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/frontend-api/moods/1/stop/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = client_with_session(&mock_server).await;
        let result = client.stop(1.into(), SoundType::Mood).await;
        assert!(matches!(result, Err(ClientError::ParseError(_))));
    }
}
