//! HTTP-level contract tests against a local mock server: status
//! classification, embedded-error detection, catalog cache behavior.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use url::Url;

use flowgen_llm::{
    build_messages, ApiClient, ApiClientConfig, CredentialSource, GenerationService, LlmError,
    ModelCatalog, FEATURED_MODELS,
};

fn client_for(server: &MockServer) -> ApiClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let base = Url::parse(&server.url("/v1")).expect("mock server url");
    ApiClient::new(ApiClientConfig::default().with_base_url(base))
}

struct FixedCreds {
    api_key: Option<String>,
    default_model: Option<String>,
}

impl CredentialSource for FixedCreds {
    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
    fn default_model(&self) -> Option<String> {
        self.default_model.clone()
    }
}

#[tokio::test]
async fn list_models_returns_catalog_in_api_order() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/models")
            .header("authorization", "Bearer test-key");
        then.status(200).json_body(serde_json::json!({
            "data": [
                { "id": "openai/gpt-4.1", "name": "GPT-4.1" },
                { "id": "acme/foo" }
            ]
        }));
    });

    let models = client_for(&server)
        .list_models("test-key")
        .await
        .expect("models fetch");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4.1");
    assert_eq!(models[0].name, "GPT-4.1");
    // Missing display name falls back to the id.
    assert_eq!(models[1].name, "acme/foo");
}

#[tokio::test]
async fn list_models_unauthorized_is_authentication() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(401).body(r#"{"error":{"message":"bad key"}}"#);
    });

    let err = client_for(&server).list_models("bad-key").await.unwrap_err();
    assert_eq!(err, LlmError::Authentication);
}

#[tokio::test]
async fn list_models_without_data_field_is_format_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(200).json_body(serde_json::json!({ "object": "list" }));
    });

    let err = client_for(&server).list_models("key").await.unwrap_err();
    assert!(matches!(err, LlmError::UnexpectedFormat(_)));
}

#[tokio::test]
async fn get_credits_reports_totals() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/credits");
        then.status(200).json_body(serde_json::json!({
            "data": { "total_credits": 10.0, "total_usage": 5.0 }
        }));
    });

    let credits = client_for(&server).get_credits("key").await.expect("credits");
    assert_eq!(credits.total_credits, 10.0);
    assert_eq!(credits.total_usage, 5.0);
    assert_eq!(credits.remaining(), 5.0);
}

#[tokio::test]
async fn get_credits_non_success_is_soft_unavailable() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/credits");
        then.status(404).body("not found");
    });

    let err = client_for(&server).get_credits("key").await.unwrap_err();
    assert_eq!(err, LlmError::Unavailable);
}

#[tokio::test]
async fn generate_sends_messages_and_max_tokens() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body_partial(
                r#"{
                    "model": "m",
                    "max_tokens": 500,
                    "messages": [
                        { "role": "system", "content": "Be terse" },
                        { "role": "user", "content": "Hi" }
                    ]
                }"#,
            );
        then.status(200).json_body(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": " Hello! " } } ]
        }));
    });

    let messages = build_messages("Hi", Some("Be terse"));
    let text = client_for(&server)
        .generate("test-key", "m", &messages)
        .await
        .expect("generation");
    mock.assert();
    // The client hands back the raw content; trimming is the service's job.
    assert_eq!(text, " Hello! ");
}

#[tokio::test]
async fn generate_status_classes() {
    let server = MockServer::start();
    let mut rate_limited = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("slow down");
    });
    let client = client_for(&server);
    let messages = build_messages("Hi", None);

    let err = client.generate("key", "m", &messages).await.unwrap_err();
    assert_eq!(err, LlmError::RateLimited);

    rate_limited.delete();
    let _server_error = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).body("overloaded");
    });
    let err = client.generate("key", "m", &messages).await.unwrap_err();
    assert_eq!(err, LlmError::Server(503));
}

#[tokio::test]
async fn generate_embedded_error_on_http_success() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(serde_json::json!({ "error": { "message": "insufficient_quota" } }));
    });

    let messages = build_messages("Hi", None);
    let err = client_for(&server)
        .generate("key", "m", &messages)
        .await
        .unwrap_err();
    assert_eq!(err, LlmError::Api("insufficient_quota".to_string()));
}

#[tokio::test]
async fn generate_with_empty_key_never_touches_the_network() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({ "choices": [] }));
    });

    let messages = build_messages("Hi", None);
    let err = client_for(&server)
        .generate("   ", "m", &messages)
        .await
        .unwrap_err();
    assert_eq!(err, LlmError::NoApiKey);
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn generation_service_trims_and_resolves_default_model() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body_partial(r#"{ "model": "acme/default" }"#);
        then.status(200).json_body(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": " Hello! " } } ]
        }));
    });

    let creds = Arc::new(FixedCreds {
        api_key: Some("test-key".to_string()),
        default_model: Some("acme/default".to_string()),
    });
    let service = GenerationService::new(Arc::new(client_for(&server)), creds);

    let text = service
        .generate_text("Hi", None, None)
        .await
        .expect("generation");
    mock.assert();
    assert_eq!(text, "Hello!");
}

#[tokio::test]
async fn generation_service_without_key_fails_before_any_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({ "choices": [] }));
    });

    let creds = Arc::new(FixedCreds {
        api_key: None,
        default_model: None,
    });
    let service = GenerationService::new(Arc::new(client_for(&server)), creds);

    let err = service.generate_text("Hi", None, None).await.unwrap_err();
    assert_eq!(err, LlmError::NoApiKey);
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn catalog_serves_cached_entries_within_ttl() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(200).json_body(serde_json::json!({
            "data": [ { "id": "acme/foo", "name": "foo" } ]
        }));
    });

    let catalog = ModelCatalog::with_ttl(
        Arc::new(client_for(&server)),
        Duration::from_secs(1_000),
    );

    let first = catalog.models("key").await;
    let second = catalog.models("key").await;
    assert_eq!(mock.hits(), 1, "second call must be served from cache");
    assert_eq!(*first, *second);
}

#[tokio::test]
async fn catalog_failure_does_not_clear_a_valid_cache() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(200).json_body(serde_json::json!({
            "data": [ { "id": "acme/foo", "name": "foo" } ]
        }));
    });

    let catalog = ModelCatalog::with_ttl(
        Arc::new(client_for(&server)),
        Duration::from_secs(1_000),
    );
    let first = catalog.models("key").await;

    // Server starts failing; the still-valid cache must be returned verbatim.
    ok.delete();
    let _broken = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(500).body("down");
    });

    let second = catalog.models("key").await;
    assert_eq!(*first, *second);
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn expired_catalog_with_failing_fetch_falls_back_to_featured() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(200).json_body(serde_json::json!({
            "data": [ { "id": "acme/foo", "name": "foo" } ]
        }));
    });

    // Zero TTL: every call is a refresh attempt.
    let catalog = ModelCatalog::with_ttl(Arc::new(client_for(&server)), Duration::ZERO);
    let fresh = catalog.models("key").await;
    assert_eq!(fresh.len(), 1);

    ok.delete();
    let _broken = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(500).body("down");
    });

    let fallback = catalog.models("key").await;
    assert_eq!(fallback.len(), FEATURED_MODELS.len());
    assert!(fallback.iter().any(|m| m.id == "openai/gpt-4.1"));
}

#[tokio::test]
async fn catalog_search_ranks_featured_first() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/models");
        then.status(200).json_body(serde_json::json!({
            "data": [
                { "id": "acme/foo", "name": "foo" },
                { "id": "openai/gpt-4.1", "name": "gpt-4.1" }
            ]
        }));
    });

    let catalog = ModelCatalog::new(Arc::new(client_for(&server)));
    let hits = catalog.search("key", "").await;
    let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["gpt-4.1", "foo"]);
}
