//! Integration tests for the OpenAI-compatible completion provider against
//! a mock HTTP server.

use multiagent::routing::{
    adapters::openai::OpenAiCompatibleProvider,
    domain::{CompletionRequest, ProviderErrorKind},
    ports::CompletionProvider,
};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn provider(server: &MockServer) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(format!("{}/v1/", server.uri()), "secret-key")
}

fn request() -> CompletionRequest {
    CompletionRequest::prompt("You are a planner.", "Plan the login page.")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sends_chat_completion_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_partial_json(json!({
            "model": "gpt-5.2-codex",
            "messages": [
                {"role": "system", "content": "You are a planner."},
                {"role": "user", "content": "Plan the login page."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "1. Build the form"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = provider(&server)
        .complete("gpt-5.2-codex", &request())
        .await
        .expect("completion should succeed");

    assert_eq!(completion.model, "gpt-5.2-codex");
    assert_eq!(completion.content, "1. Build the form");
}

#[rstest]
#[case(401, ProviderErrorKind::Auth)]
#[case(403, ProviderErrorKind::Auth)]
#[case(429, ProviderErrorKind::RateLimit)]
#[case(503, ProviderErrorKind::Server)]
#[case(400, ProviderErrorKind::Other)]
#[tokio::test(flavor = "multi_thread")]
async fn classifies_http_failures(#[case] status: u16, #[case] expected: ProviderErrorKind) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete("gemini-2.5-pro", &request())
        .await
        .expect_err("non-success status should fail");

    assert_eq!(err.kind(), expected);
    assert!(err.message().contains(&status.to_string()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn response_without_content_is_an_other_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete("gemini-2.5-pro", &request())
        .await
        .expect_err("empty choices should fail");

    assert_eq!(err.kind(), ProviderErrorKind::Other);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out_as_other_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .with_timeout(Duration::from_millis(100))
        .complete("gemini-2.5-pro", &request())
        .await
        .expect_err("slow response should time out");

    assert_eq!(err.kind(), ProviderErrorKind::Other);
    assert!(err.message().contains("timed out"));
}
