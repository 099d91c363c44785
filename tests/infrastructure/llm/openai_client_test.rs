use anchorspan::application::ports::{CompletionRequest, LlmClient, LlmClientError};
use anchorspan::infrastructure::llm::OpenAiClient;
use anchorspan::presentation::config::LlmSettings;

fn request() -> CompletionRequest {
    CompletionRequest {
        system: "system".to_string(),
        user: "user".to_string(),
        max_output_tokens: 8,
    }
}

fn key_in_environment() -> bool {
    ["OPENAI_API_KEY", "OPENAI_APIKEY", "OPENAI_KEY"]
        .iter()
        .any(|var| std::env::var(var).is_ok_and(|v| !v.trim().is_empty()))
}

#[tokio::test]
async fn given_hosted_provider_without_key_when_completing_then_missing_credential() {
    if key_in_environment() {
        return;
    }
    let settings = LlmSettings {
        enabled: true,
        base_url: "http://127.0.0.1:9/v1".to_string(),
        ..LlmSettings::default()
    };
    let client = OpenAiClient::new(&settings).unwrap();

    let result = client.complete(&request()).await;

    assert!(matches!(result, Err(LlmClientError::MissingCredential)));
}

#[tokio::test]
async fn given_local_provider_unreachable_when_completing_then_request_fails() {
    let settings = LlmSettings {
        enabled: true,
        provider: "local".to_string(),
        base_url: "http://127.0.0.1:9/v1/".to_string(),
        timeout_secs: 2,
        ..LlmSettings::default()
    };
    let client = OpenAiClient::new(&settings).unwrap();

    let result = client.complete(&request()).await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(_))));
}
