//! OpenAI 兼容的 chat completions 视觉客户端

use super::{sniff_mime, InferenceError, InferencePurpose, VisionModel, VisionRequest};
use crate::config::InferenceConfig;
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Content {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    identify_model: String,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        if config.api_key.is_empty() {
            return Err(InferenceError::Config("api_key is empty".to_string()));
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            identify_model: config.identify_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn model_for(&self, purpose: InferencePurpose) -> &str {
        match purpose {
            InferencePurpose::Identification => &self.identify_model,
            InferencePurpose::Extraction => &self.model,
        }
    }

    fn build_request(&self, request: &VisionRequest<'_>) -> ChatRequest {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(request.image);
        let image_url = format!("data:{};base64,{}", sniff_mime(request.image), image_b64);

        // 识别只需要低分辨率
        let detail = match request.purpose {
            InferencePurpose::Identification => "low",
            InferencePurpose::Extraction => "high",
        };

        ChatRequest {
            model: self.model_for(request.purpose).to_string(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    Content::Text {
                        text: request.instructions.to_string(),
                    },
                    Content::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url,
                            detail,
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
            temperature: 0.0,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn complete(&self, request: VisionRequest<'_>) -> Result<String, InferenceError> {
        let start = Instant::now();
        let body = self.build_request(&request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "推理服务返回错误 {:?}: status={}, 耗时: {:?}",
                request.purpose,
                status,
                start.elapsed()
            );
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(InferenceError::EmptyResponse)?;

        tracing::debug!(
            "推理调用完成 {:?}: model={}, {} 字符, 耗时: {:?}",
            request.purpose,
            body.model,
            content.len(),
            start.elapsed()
        );
        Ok(content)
    }
}
