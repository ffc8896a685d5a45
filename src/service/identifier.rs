use crate::inference::{extract_json, InferencePurpose, VisionModel, VisionRequest};
use crate::models::ProviderIdentification;
use crate::profiles::ExtractionProfile;
use std::fmt::Write as _;
use std::sync::Arc;

/// 供应商识别：轻量推理调用，永不失败
pub struct ProviderIdentifier {
    model: Arc<dyn VisionModel>,
    instructions: String,
}

impl ProviderIdentifier {
    pub fn new<'a>(
        model: Arc<dyn VisionModel>,
        profiles: impl IntoIterator<Item = &'a ExtractionProfile>,
    ) -> Self {
        Self {
            model,
            instructions: build_instructions(profiles),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// 推理失败或输出无法解析时返回 {provider: "unknown", confidence: 0}
    pub async fn identify(&self, image: &[u8]) -> ProviderIdentification {
        let raw = match self
            .model
            .complete(VisionRequest {
                purpose: InferencePurpose::Identification,
                image,
                instructions: &self.instructions,
            })
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("供应商识别调用失败, 使用 unknown: {}", e);
                return ProviderIdentification::unknown(format!("identification call failed: {}", e));
            }
        };

        let parsed = extract_json(&raw)
            .ok_or_else(|| "no JSON object in response".to_string())
            .and_then(|json| {
                serde_json::from_str::<ProviderIdentification>(json).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(identification) => {
                let identification = identification.normalized();
                tracing::info!(
                    "识别供应商: {} (置信度 {:.2})",
                    identification.provider,
                    identification.confidence
                );
                identification
            }
            Err(reason) => {
                tracing::warn!("供应商识别结果无法解析, 使用 unknown: {}", reason);
                ProviderIdentification::unknown(format!("unparsable identification: {}", reason))
            }
        }
    }
}

fn build_instructions<'a>(profiles: impl IntoIterator<Item = &'a ExtractionProfile>) -> String {
    let mut out = String::from(
        "Identify which electricity supplier issued the bill in this image.\n\
         Known suppliers and their visual cues:\n",
    );
    for profile in profiles {
        let _ = writeln!(
            out,
            "- \"{}\" ({}): {}",
            profile.provider,
            profile.display_name,
            profile.visual_cues.join("; ")
        );
    }
    out.push_str(
        "If the supplier is not in the list, answer \"unknown\".\n\
         Respond with ONE JSON object and nothing else: \
         {\"provider\": string, \"confidence\": number between 0 and 1, \"reasoning\": string}",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceError;
    use crate::profiles::SPECIALIZED;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Canned(Result<&'static str, ()>);

    #[async_trait]
    impl VisionModel for Canned {
        async fn complete(&self, request: VisionRequest<'_>) -> Result<String, InferenceError> {
            assert_eq!(request.purpose, InferencePurpose::Identification);
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(InferenceError::EmptyResponse),
            }
        }
    }

    fn identifier(reply: Result<&'static str, ()>) -> ProviderIdentifier {
        ProviderIdentifier::new(Arc::new(Canned(reply)), SPECIALIZED.iter().copied())
    }

    #[tokio::test]
    async fn parses_and_normalizes_reply() {
        let id = identifier(Ok("```json\n{\"provider\": \" Tibber \", \"confidence\": 1.4, \"reasoning\": \"logo\"}\n```"))
            .identify(b"img")
            .await;

        assert_eq!(id.provider, "tibber");
        assert_eq!(id.confidence, 1.0);
    }

    #[tokio::test]
    async fn call_failure_degrades_to_unknown() {
        let id = identifier(Err(())).identify(b"img").await;

        assert_eq!(id.provider, "unknown");
        assert_eq!(id.confidence, 0.0);
    }

    #[tokio::test]
    async fn garbage_reply_degrades_to_unknown() {
        let id = identifier(Ok("The bill looks like it is from Fjordkraft."))
            .identify(b"img")
            .await;

        assert_eq!(id.provider, "unknown");
        assert_eq!(id.confidence, 0.0);
    }

    #[test]
    fn instructions_list_known_providers() {
        let text = identifier(Ok("{}")).instructions().to_string();
        assert!(text.contains("\"fjordkraft\""));
        assert!(text.contains("\"motkraft\""));
        assert!(text.contains("unknown"));
    }
}
