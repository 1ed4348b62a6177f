use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::config::{Config, OPENROUTER_KEY_VAR};
use crate::error::{Error, Result};
use crate::models::{IdentificationResult, ImageInput};

use super::PlantIdentifier;

const SERVICE: &str = "OpenRouter";

// The answer is used verbatim as a search term, so keep it short and deterministic.
pub const IDENTIFY_PROMPT: &str = "Identify the plant in this image. \
    Reply with ONLY the plant's common name, for example: Sunflower. \
    Do not add any other words, punctuation, or explanation.";
pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 50;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageData },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Progress of a single identification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Encoding,
    AwaitingInference,
    Parsed(String),
    Failed,
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Parsed(_) | AttemptState::Failed)
    }

    fn advance(&mut self, next: AttemptState) {
        log::debug!("🔁 Identification attempt: {:?} → {:?}", self, next);
        *self = next;
    }
}

/// Vision identifier backed by an OpenAI-compatible chat endpoint.
pub struct OpenRouterIdentifier {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterIdentifier {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api_key: config.openrouter_api_key.clone(),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            model: config.openrouter_model.clone(),
            client: config.http_client()?,
        })
    }

    fn build_request(&self, data_url: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: IDENTIFY_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageData { url: data_url },
                    },
                ],
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    async fn run(&self, image: &ImageInput, state: &mut AttemptState) -> Result<IdentificationResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential(OPENROUTER_KEY_VAR))?;

        state.advance(AttemptState::Encoding);
        let data_url = encode_data_url(image);
        log::debug!(
            "📊 Image size: {} bytes ({}), data URL size: {} bytes",
            image.bytes.len(),
            image.mime_type,
            data_url.len()
        );

        let request = self.build_request(data_url);

        state.advance(AttemptState::AwaitingInference);
        log::info!("🤖 Sending identification request to OpenRouter with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| Error::transport(SERVICE, source))?;

        let status = response.status();
        log::debug!("📥 OpenRouter response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| Error::transport(SERVICE, source))?;

        if !status.is_success() {
            return Err(Error::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|source| Error::Decode { service: SERVICE, source })?;

        parse_completion(chat_response)
    }
}

#[async_trait::async_trait]
impl PlantIdentifier for OpenRouterIdentifier {
    async fn try_identify(&self, image: &ImageInput) -> Result<IdentificationResult> {
        let mut state = AttemptState::Idle;

        match self.run(image, &mut state).await {
            Ok(result) => {
                state.advance(AttemptState::Parsed(result.name().to_string()));
                log::info!("🌱 Identified plant: {}", result.name());
                Ok(result)
            }
            Err(e) => {
                state.advance(AttemptState::Failed);
                Err(e)
            }
        }
    }
}

pub fn encode_data_url(image: &ImageInput) -> String {
    let encoded = general_purpose::STANDARD.encode(&image.bytes);
    format!("data:{};base64,{}", image.mime_type, encoded)
}

fn parse_completion(response: ChatResponse) -> Result<IdentificationResult> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    log::debug!("💬 OpenRouter completion: {:?}", content);

    IdentificationResult::from_completion(&content).ok_or(Error::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn identifier_for(server: &MockServer) -> OpenRouterIdentifier {
        let config = Config::default()
            .with_openrouter("test_key", format!("{}/api/v1", server.uri()))
            .with_model("test/vision-model");
        OpenRouterIdentifier::new(&config).unwrap()
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }))
    }

    fn leaf() -> ImageInput {
        ImageInput::from_upload(vec![0x89, 0x50, 0x4e, 0x47], "leaf.png")
    }

    #[test]
    fn test_encode_data_url() {
        let image = ImageInput::from_upload(b"hello".to_vec(), "leaf.png");
        assert_eq!(encode_data_url(&image), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_request_shape() {
        let identifier = OpenRouterIdentifier::new(
            &Config::default().with_openrouter("k", "http://localhost").with_model("m"),
        )
        .unwrap();
        let request = identifier.build_request("data:image/jpeg;base64,AAAA".to_string());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "m");
        assert_eq!(value["max_tokens"], MAX_TOKENS);
        assert!(value["temperature"].as_f64().unwrap() < 0.2);

        let content = &value["messages"][0]["content"];
        assert_eq!(content.as_array().unwrap().len(), 2);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], IDENTIFY_PROMPT);
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_attempt_state_terminal() {
        assert!(!AttemptState::Idle.is_terminal());
        assert!(!AttemptState::Encoding.is_terminal());
        assert!(!AttemptState::AwaitingInference.is_terminal());
        assert!(AttemptState::Parsed("Rose".to_string()).is_terminal());
        assert!(AttemptState::Failed.is_terminal());
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(parse_completion(response), Err(Error::EmptyCompletion)));
    }

    #[tokio::test]
    async fn test_identify_trims_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(bearer_token("test_key"))
            .respond_with(completion(json!("  Sunflower\n")))
            .expect(1)
            .mount(&server)
            .await;

        let result = identifier_for(&server).identify(&leaf()).await.unwrap();
        assert_eq!(result.name(), "Sunflower");
    }

    #[tokio::test]
    async fn test_request_carries_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(json!("Fern")))
            .mount(&server)
            .await;

        identifier_for(&server).try_identify(&leaf()).await.unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["model"], "test/vision-model");
        let url = body["messages"][0]["content"][1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_empty_completion_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(json!("   ")))
            .mount(&server)
            .await;

        let identifier = identifier_for(&server);
        let err = identifier.try_identify(&leaf()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyCompletion));
        assert!(identifier.identify(&leaf()).await.is_none());
    }

    #[tokio::test]
    async fn test_null_completion_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(serde_json::Value::Null))
            .mount(&server)
            .await;

        assert!(identifier_for(&server).identify(&leaf()).await.is_none());
    }

    #[tokio::test]
    async fn test_auth_failure_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "No auth credentials found", "code": 401 }
            })))
            .mount(&server)
            .await;

        let err = identifier_for(&server).try_identify(&leaf()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = identifier_for(&server).try_identify(&leaf()).await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion(json!("Rose")))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.openrouter_base_url = server.uri();
        let identifier = OpenRouterIdentifier::new(&config).unwrap();

        let err = identifier.try_identify(&leaf()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(identifier.identify(&leaf()).await.is_none());
    }
}
