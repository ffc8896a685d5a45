//! 多模态推理服务的调用边界

pub mod json;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use json::extract_json;
pub use openai::OpenAiVisionClient;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP request to inference service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("inference service returned no content")]
    EmptyResponse,

    #[error("inference client misconfigured: {0}")]
    Config(String),
}

/// 调用目的：识别用轻量模型，提取用完整模型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferencePurpose {
    Identification,
    Extraction,
}

#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub purpose: InferencePurpose,
    pub image: &'a [u8],
    pub instructions: &'a str,
}

/// 单次、非流式、无重试的视觉推理调用，返回模型的原始文本
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn complete(&self, request: VisionRequest<'_>) -> Result<String, InferenceError>;
}

/// 根据文件头判断图片 MIME 类型 (手机拍照默认 JPEG)
pub fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.len() >= 12 && &image[0..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_mime(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8"), "image/webp");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(sniff_mime(&[]), "image/jpeg");
    }
}
