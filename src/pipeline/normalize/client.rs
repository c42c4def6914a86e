//! HTTP client for the hosted extraction model.
//!
//! Speaks the OpenAI-compatible chat-completions protocol: one system
//! message plus one user message carrying either the document text or
//! data-URL images. The only network hop in the pipeline, so it carries the
//! only explicit timeout.

use serde::{Deserialize, Serialize};

use crate::config::NormalizeConfig;

use super::types::{ChatModel, ModelRequest, RequestMode};
use super::NormalizeError;

pub struct ChatCompletionsClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ChatCompletionsClient {
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

    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            &config.model,
            config.timeout_secs,
        )
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn user_content(request: &ModelRequest) -> serde_json::Value {
    match request.mode {
        RequestMode::Text => serde_json::Value::String(request.user.clone()),
        RequestMode::Vision => {
            let mut parts: Vec<serde_json::Value> = request
                .images
                .iter()
                .map(|url| {
                    serde_json::json!({
                        "type": "image_url",
                        "image_url": { "url": url }
                    })
                })
                .collect();
            parts.push(serde_json::json!({
                "type": "text",
                "text": request.user
            }));
            serde_json::Value::Array(parts)
        }
    }
}

impl ChatModel for ChatCompletionsClient {
    fn complete(&self, request: &ModelRequest) -> Result<String, NormalizeError> {
        let api_key = self.api_key.as_deref().ok_or(NormalizeError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequestBody {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: serde_json::Value::String(request.system.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content(request),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            mode = request.mode.as_str(),
            model = %self.model,
            "Sending model request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    NormalizeError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    NormalizeError::Timeout {
                        seconds: self.timeout_secs,
                    }
                } else {
                    NormalizeError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NormalizeError::ServiceUnavailable {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponseBody = response
            .json()
            .map_err(|e| NormalizeError::MalformedModelOutput(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                NormalizeError::MalformedModelOutput("response carried no content".into())
            })
    }
}

/// Mock model for testing — yields a configured sequence of outcomes, then
/// repeats the last one.
pub struct MockChatModel {
    outcomes: std::sync::Mutex<std::collections::VecDeque<MockOutcome>>,
    last: MockOutcome,
    pub calls: std::sync::Mutex<Vec<RequestMode>>,
}

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply(String),
    Timeout,
    Unavailable,
}

impl MockChatModel {
    pub fn new(response: &str) -> Self {
        Self::with_outcomes(vec![MockOutcome::Reply(response.to_string())])
    }

    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        let last = outcomes
            .last()
            .cloned()
            .unwrap_or(MockOutcome::Reply(String::new()));
        Self {
            outcomes: std::sync::Mutex::new(outcomes.into()),
            last,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ChatModel for MockChatModel {
    fn complete(&self, request: &ModelRequest) -> Result<String, NormalizeError> {
        self.calls.lock().unwrap().push(request.mode);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone());
        match outcome {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::Timeout => Err(NormalizeError::Timeout { seconds: 1 }),
            MockOutcome::Unavailable => Err(NormalizeError::ServiceUnavailable {
                status: 503,
                body: "overloaded".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails_before_any_network_io() {
        let client = ChatCompletionsClient::new("http://localhost:9", None, "glm-4.6v", 1);
        let request = ModelRequest {
            mode: RequestMode::Text,
            system: "s".into(),
            user: "u".into(),
            images: vec![],
            temperature: 0.1,
            max_tokens: 100,
        };
        let err = client.complete(&request).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingApiKey));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            ChatCompletionsClient::new("https://api.example.com/v4/", None, "glm-4.6v", 30);
        assert_eq!(client.base_url, "https://api.example.com/v4");
    }

    #[test]
    fn vision_content_lists_images_before_instruction() {
        let request = ModelRequest {
            mode: RequestMode::Vision,
            system: "s".into(),
            user: "extract".into(),
            images: vec!["data:image/png;base64,AAA".into(), "data:image/jpeg;base64,BBB".into()],
            temperature: 0.1,
            max_tokens: 100,
        };
        let content = user_content(&request);
        let parts = content.as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,BBB");
        assert_eq!(parts[2]["type"], "text");
    }

    #[test]
    fn text_content_is_plain_string() {
        let request = ModelRequest {
            mode: RequestMode::Text,
            system: "s".into(),
            user: "extract this".into(),
            images: vec![],
            temperature: 0.1,
            max_tokens: 100,
        };
        assert_eq!(user_content(&request), serde_json::json!("extract this"));
    }

    #[test]
    fn mock_replays_sequence_then_repeats_last() {
        let mock = MockChatModel::with_outcomes(vec![
            MockOutcome::Unavailable,
            MockOutcome::Reply("ok".into()),
        ]);
        let request = ModelRequest {
            mode: RequestMode::Text,
            system: String::new(),
            user: String::new(),
            images: vec![],
            temperature: 0.0,
            max_tokens: 1,
        };
        assert!(mock.complete(&request).is_err());
        assert_eq!(mock.complete(&request).unwrap(), "ok");
        assert_eq!(mock.complete(&request).unwrap(), "ok");
        assert_eq!(mock.call_count(), 3);
    }
}
