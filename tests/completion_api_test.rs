//! Wire-level tests of the completion clients against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_commit::ai::{CompletionClient, GeminiClient, OpenAiClient};
use ai_commit::prompt::Message;

fn conversation() -> Vec<Message> {
    vec![
        Message::system("You write commit messages."),
        Message::user("diff --git a/a.rs b/a.rs\n+fn a() {}\n"),
    ]
}

#[tokio::test]
async fn openai_sends_expected_payload_and_extracts_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "temperature": 0.5,
            "max_tokens": 196,
            "messages": [
                {"role": "system", "content": "You write commit messages."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "feat: add login"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(
        "gpt-4".to_string(),
        "sk-test".to_string(),
        server.uri(),
        0.5,
        196,
    )
    .unwrap();

    let result = client.complete(&conversation()).await.unwrap();
    assert_eq!(result, "feat: add login");
}

#[tokio::test]
async fn openai_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(
        "gpt-4".to_string(),
        "sk-bad".to_string(),
        server.uri(),
        0.5,
        196,
    )
    .unwrap();

    let err = client.complete(&conversation()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("HTTP 401"));
    assert!(message.contains("invalid api key"));
}

#[tokio::test]
async fn openai_missing_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(
        "gpt-4".to_string(),
        "sk-test".to_string(),
        server.uri(),
        0.5,
        196,
    )
    .unwrap();

    let err = client.complete(&conversation()).await.unwrap_err();
    assert!(err.to_string().contains("No choices in response"));
}

#[tokio::test]
async fn gemini_sends_expected_payload_and_extracts_first_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "system_instruction": {
                "parts": [{"text": "You write commit messages."}]
            },
            "generationConfig": {
                "maxOutputTokens": 65536,
                "responseMimeType": "text/plain"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Add login feature"}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(
        "gemini-2.5-flash".to_string(),
        "test-key".to_string(),
        server.uri(),
        0.5,
        65536,
    )
    .unwrap();

    let result = client.complete(&conversation()).await.unwrap();
    assert_eq!(result, "Add login feature");
}

#[tokio::test]
async fn gemini_without_candidates_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::new(
        "gemini-2.5-flash".to_string(),
        "test-key".to_string(),
        server.uri(),
        0.5,
        65536,
    )
    .unwrap();

    let err = client.complete(&conversation()).await.unwrap_err();
    assert!(err.to_string().contains("No candidates in response"));
}
