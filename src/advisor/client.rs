use serde::{Deserialize, Serialize};

use super::AdvisorError;

/// Hosted OpenAI-compatible inference endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.modelscope.cn/v1";

/// Default model served at that endpoint.
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";

/// Environment variable consulted for the API key when none is set.
pub const API_KEY_ENV: &str = "SEEDLING_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

/// One wire-format chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

/// Seam for the chat-completion call so commands can be tested without a
/// network.
pub trait ChatBackend {
    fn complete(&self, messages: &[ChatTurn]) -> Result<String, AdvisorError>;
}

/// Blocking HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct AdvisorClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AdvisorClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default hosted endpoint; key taken from the environment when present.
    pub fn default_hosted() -> Self {
        Self::new(
            DEFAULT_BASE_URL,
            std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            DEFAULT_MODEL,
            DEFAULT_TIMEOUT_SECS,
        )
    }

    /// Replace the API key (settings dialog).
    pub fn set_api_key(&mut self, api_key: &str) {
        let trimmed = api_key.trim();
        self.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Replace the model name.
    pub fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Response body from POST /chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatBackend for AdvisorClient {
    fn complete(&self, messages: &[ChatTurn]) -> Result<String, AdvisorError> {
        let api_key = self.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AdvisorError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    AdvisorError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    AdvisorError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| AdvisorError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AdvisorError::EmptyResponse)
    }
}

/// Mock backend for testing — canned reply, records what it was sent.
pub struct MockBackend {
    response: Result<String, fn() -> AdvisorError>,
    calls: std::sync::Mutex<Vec<Vec<ChatTurn>>>,
}

impl MockBackend {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make_error: fn() -> AdvisorError) -> Self {
        Self {
            response: Err(make_error),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Message lists from every call made so far.
    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().expect("mock lock").clone()
    }
}

impl ChatBackend for MockBackend {
    fn complete(&self, messages: &[ChatTurn]) -> Result<String, AdvisorError> {
        self.calls.lock().expect("mock lock").push(messages.to_vec());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_format() {
        let messages = vec![
            ChatTurn::system("You are an advisor."),
            ChatTurn::user("Is spinach ok?"),
        ];
        let body = ChatCompletionRequest {
            model: DEFAULT_MODEL,
            messages: &messages,
            temperature: 0.7,
            max_tokens: 2000,
            stream: false,
        };

        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Is spinach ok?");
    }

    #[test]
    fn response_parsing_takes_first_choice() {
        let raw = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Plenty of iron in spinach."}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap();
        assert_eq!(content, "Plenty of iron in spinach.");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = AdvisorClient::new("https://example.test/v1/", None, "m", 30);
        assert_eq!(client.base_url(), "https://example.test/v1");
    }

    #[test]
    fn missing_api_key_fails_before_network() {
        let client = AdvisorClient::new("https://example.invalid/v1", None, "m", 30);
        let result = client.complete(&[ChatTurn::user("hello")]);
        assert!(matches!(result, Err(AdvisorError::MissingApiKey)));
    }

    #[test]
    fn set_api_key_blank_clears() {
        let mut client = AdvisorClient::new("https://example.invalid/v1", None, "m", 30);
        client.set_api_key("  secret  ");
        assert!(client.has_api_key());
        client.set_api_key("   ");
        assert!(!client.has_api_key());
    }

    #[test]
    fn mock_backend_records_calls() {
        let mock = MockBackend::replying("ok");
        let messages = vec![ChatTurn::user("q1")];
        assert_eq!(mock.complete(&messages).unwrap(), "ok");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].content, "q1");
    }

    #[test]
    fn mock_backend_failure() {
        let mock = MockBackend::failing(|| AdvisorError::EmptyResponse);
        assert!(matches!(
            mock.complete(&[ChatTurn::user("q")]),
            Err(AdvisorError::EmptyResponse)
        ));
    }
}
