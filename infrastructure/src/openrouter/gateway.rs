//! OpenRouter LLM Gateway implementation

use super::data_url;
use super::error::{OpenRouterError, Result};
use super::protocol::{
    ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, ContentPart, IMAGE_MODALITIES,
    ResponseMessage,
};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storybook_application::{GatewayError, ImageRequest, LlmGateway, TextRequest};
use storybook_domain::{ImageFormat, Model, PageImage, PromptTemplate, preview};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, warn};

/// Connection settings for [`OpenRouterGateway`]
#[derive(Clone)]
pub struct OpenRouterSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub app_name: Option<String>,
}

impl OpenRouterSettings {
    pub fn from_config(config: &FileProviderConfig, api_key: String) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            app_name: config.app_name.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Delay before retry number `attempt` (1-based); grows linearly
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff * attempt
    }
}

impl std::fmt::Debug for OpenRouterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("app_name", &self.app_name)
            .finish()
    }
}

/// Where the generated image can be found
#[derive(Debug, PartialEq)]
enum ImageSource {
    Inline(PageImage),
    Remote(String),
}

/// LLM Gateway implementation for OpenRouter chat completions
pub struct OpenRouterGateway {
    client: reqwest::Client,
    settings: OpenRouterSettings,
}

impl OpenRouterGateway {
    /// Create a new gateway with its own HTTP client
    pub fn new(settings: OpenRouterSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(name) = settings.app_name.as_deref()
            && let Ok(value) = HeaderValue::from_str(name)
        {
            headers.insert("X-Title", value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()?;

        info!(base_url = %settings.base_url, "OpenRouterGateway initialized");
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &OpenRouterSettings {
        &self.settings
    }

    /// Delays between attempts: `retry_backoff * n` for n in 1..=max_retries
    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        (1..=self.settings.max_retries).map(move |attempt| self.settings.backoff(attempt))
    }

    /// Run `op`, retrying transient failures with linear backoff
    async fn with_retry<T, F, Fut>(&self, what: &str, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_retries = self.settings.max_retries;
        let attempts = AtomicU32::new(0);
        let (attempts, op) = (&attempts, &op);

        Retry::spawn(self.retry_strategy(), move || async move {
            let n = attempts.fetch_add(1, Ordering::Relaxed);
            match op().await {
                Ok(value) => Ok(value),
                Err(e) if e.is_transient() => {
                    if n < max_retries {
                        warn!(
                            attempt = n + 1,
                            max_retries,
                            error = %e,
                            "{} failed, retrying",
                            what
                        );
                    }
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    async fn chat_once(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OpenRouterError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let mut parsed: ChatResponse = serde_json::from_str(&body)?;
        if parsed.choices.is_empty()
            && let Some(error) = parsed.error.take()
        {
            // upstream provider failure reported inside a 200
            let status = error
                .code
                .as_ref()
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(502);
            return Err(OpenRouterError::Status {
                status,
                message: error.message,
            });
        }
        Ok(parsed)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ResponseMessage> {
        debug!(model = %request.model, "Sending chat completion");
        let response = self
            .with_retry("chat completion", || self.chat_once(request))
            .await?;
        first_message(response)
    }

    async fn download_once(&self, url: &str) -> Result<PageImage> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OpenRouterError::Status {
                status: status.as_u16(),
                message: format!("image download from {} failed", url),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(ImageFormat::from_mime);
        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(OpenRouterError::UnsupportedImage("empty download".to_string()));
        }

        data_url::page_image(bytes, declared).ok_or_else(|| {
            OpenRouterError::UnsupportedImage(format!("unrecognised bytes from {}", url))
        })
    }

    async fn generate(&self, request: ImageRequest<'_>) -> Result<PageImage> {
        let chat_request = image_request(request.model, request.prompt, request.reference);
        let message = self.chat(&chat_request).await?;

        match image_source(&message)? {
            ImageSource::Inline(image) => Ok(image),
            ImageSource::Remote(url) => {
                debug!(url = %url, "Downloading generated image");
                self.with_retry("image download", || self.download_once(&url))
                    .await
            }
        }
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete_text(
        &self,
        request: TextRequest<'_>,
    ) -> std::result::Result<String, GatewayError> {
        let chat_request = text_request(
            request.model,
            request.system_prompt,
            request.user_prompt,
            request.temperature,
        );
        let message = self.chat(&chat_request).await?;
        Ok(message.text())
    }

    async fn generate_image(
        &self,
        request: ImageRequest<'_>,
    ) -> std::result::Result<PageImage, GatewayError> {
        Ok(self.generate(request).await?)
    }
}

/// Build the script request: system + user messages at the given temperature
fn text_request(model: &Model, system: &str, user: &str, temperature: f32) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        temperature: Some(temperature),
        modalities: None,
    }
}

/// Build an illustration request, attaching the style reference when given
fn image_request(model: &Model, prompt: &str, reference: Option<&PageImage>) -> ChatRequest {
    let message = match reference {
        None => ChatMessage::user(prompt),
        Some(reference) => ChatMessage::user_parts(vec![
            ContentPart::text(PromptTemplate::reference_caption()),
            ContentPart::image_url(data_url::encode(reference)),
            ContentPart::text(prompt),
        ]),
    };

    ChatRequest {
        model: model.to_string(),
        messages: vec![message],
        temperature: None,
        modalities: Some(IMAGE_MODALITIES.to_vec()),
    }
}

fn first_message(response: ChatResponse) -> Result<ResponseMessage> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(OpenRouterError::EmptyChoices)
}

/// Locate the generated image in a response message
///
/// `images[0]` is authoritative; image parts in `content` are accepted as a
/// fallback.
fn image_source(message: &ResponseMessage) -> Result<ImageSource> {
    let url = message
        .images()
        .first()
        .map(|img| img.image_url.url.as_str())
        .or_else(|| message.content.as_ref().and_then(|c| c.image_urls().next()))
        .ok_or_else(|| OpenRouterError::NoImage(preview(&message.text(), 120)))?;

    if data_url::is_data_url(url) {
        data_url::decode(url).map(ImageSource::Inline)
    } else if url.starts_with("https://") || url.starts_with("http://") {
        Ok(ImageSource::Remote(url.to_string()))
    } else {
        Err(OpenRouterError::UnsupportedImage(preview(url, 40)))
    }
}

/// Best-effort message from an error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => preview(body.trim(), 200),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openrouter::protocol::MessageContent;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn message(body: &str) -> ResponseMessage {
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        first_message(response).unwrap()
    }

    fn settings() -> OpenRouterSettings {
        OpenRouterSettings::from_config(&FileProviderConfig::default(), "sk-test".to_string())
    }

    #[test]
    fn test_text_request_shape() {
        let request = text_request(&Model::default_text(), "sys", "user", 0.7);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "google/gemini-2.5-flash-preview-09-2025");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "user");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!(value.get("modalities").is_none());
    }

    #[test]
    fn test_first_image_request_has_no_reference() {
        let request = image_request(&Model::default_image(), "draw page 1", None);

        assert_eq!(request.modalities, Some(vec!["image", "text"]));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(
            request.messages[0].content,
            MessageContent::Text("draw page 1".to_string())
        );
    }

    #[test]
    fn test_reference_request_parts_order() {
        let reference = PageImage::new(PNG_MAGIC.to_vec(), ImageFormat::Png);
        let request = image_request(&Model::default_image(), "draw page 2", Some(&reference));

        let MessageContent::Parts(parts) = &request.messages[0].content else {
            panic!("expected content parts");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], ContentPart::text("Reference image for style:"));
        assert_eq!(parts[1], ContentPart::image_url(data_url::encode(&reference)));
        assert_eq!(parts[2], ContentPart::text("draw page 2"));
    }

    #[test]
    fn test_inline_image_is_decoded() {
        let url = data_url::encode(&PageImage::new(PNG_MAGIC.to_vec(), ImageFormat::Png));
        let body = format!(
            r#"{{"choices":[{{"message":{{"content":"","images":[{{"image_url":{{"url":"{}"}}}}]}}}}]}}"#,
            url
        );

        match image_source(&message(&body)).unwrap() {
            ImageSource::Inline(image) => assert_eq!(image.format(), ImageFormat::Png),
            other => panic!("expected inline image, got {:?}", other),
        }
    }

    #[test]
    fn test_remote_image_is_located() {
        let body = r#"{"choices":[{"message":{"images":[{"image_url":{"url":"https://cdn.example.com/p.png"}}]}}]}"#;
        assert_eq!(
            image_source(&message(body)).unwrap(),
            ImageSource::Remote("https://cdn.example.com/p.png".to_string())
        );
    }

    #[test]
    fn test_image_part_in_content_is_accepted() {
        let body = r#"{"choices":[{"message":{"content":[
            {"type":"text","text":"here"},
            {"type":"image_url","image_url":{"url":"https://cdn.example.com/q.webp"}}
        ]}}]}"#;
        assert_eq!(
            image_source(&message(body)).unwrap(),
            ImageSource::Remote("https://cdn.example.com/q.webp".to_string())
        );
    }

    #[test]
    fn test_text_only_reply_is_no_image() {
        let body = r#"{"choices":[{"message":{"content":"I cannot draw that."}}]}"#;
        let err = image_source(&message(body)).unwrap_err();
        assert!(matches!(err, OpenRouterError::NoImage(ref t) if t.contains("cannot draw")));
    }

    #[test]
    fn test_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_message(response),
            Err(OpenRouterError::EmptyChoices)
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Insufficient credits","code":402}}"#),
            "Insufficient credits"
        );
        assert_eq!(error_message("  "), "empty response body");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_settings_from_config() {
        let config = FileProviderConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            retry_backoff_ms: 250,
            ..Default::default()
        };
        let settings = OpenRouterSettings::from_config(&config, "sk-or-secret".to_string());

        assert_eq!(settings.completions_url(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(settings.backoff(1), Duration::from_millis(250));
        assert_eq!(settings.backoff(3), Duration::from_millis(750));
        let gateway = OpenRouterGateway::new(settings.clone()).unwrap();
        let delays: Vec<Duration> = gateway.retry_strategy().collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(250), Duration::from_millis(500)]
        );
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[tokio::test]
    async fn test_retry_stops_after_max_retries() {
        let mut settings = settings();
        settings.max_retries = 2;
        settings.retry_backoff = Duration::ZERO;
        let gateway = OpenRouterGateway::new(settings).unwrap();

        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<()> = gateway
            .with_retry("test", || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async {
                    Err(OpenRouterError::Status {
                        status: 503,
                        message: "busy".into(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let mut settings = settings();
        settings.retry_backoff = Duration::ZERO;
        let gateway = OpenRouterGateway::new(settings).unwrap();

        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<()> = gateway
            .with_retry("test", || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async {
                    Err(OpenRouterError::Status {
                        status: 400,
                        message: "bad".into(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
