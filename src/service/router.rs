use super::identifier::ProviderIdentifier;
use crate::inference::VisionModel;
use crate::models::{BillRecord, ProviderIdentification};
use crate::profiles::{self, ExtractionError, ExtractionProfile, GENERIC};
use indexmap::IndexMap;
use std::sync::Arc;

/// 识别置信度必须严格大于该值才使用专用配置
pub const DEFAULT_IDENTIFY_THRESHOLD: f64 = 0.7;

/// 路由结果：识别结果、所选配置、原始候选记录
#[derive(Debug, Clone)]
pub struct RoutedExtraction {
    pub identification: ProviderIdentification,
    pub profile: &'static str,
    pub record: BillRecord,
}

/// 提取路由：识别 → 选择配置 → 提取
///
/// 专用配置的提取失败直接返回错误，不会在同一请求内退回通用配置。
pub struct ExtractionRouter {
    identifier: ProviderIdentifier,
    model: Arc<dyn VisionModel>,
    profiles: IndexMap<&'static str, &'static ExtractionProfile>,
    generic: &'static ExtractionProfile,
    threshold: f64,
}

impl ExtractionRouter {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self::with_profiles(model, profiles::specialized_profiles(), DEFAULT_IDENTIFY_THRESHOLD)
    }

    pub fn with_profiles(
        model: Arc<dyn VisionModel>,
        profiles: IndexMap<&'static str, &'static ExtractionProfile>,
        threshold: f64,
    ) -> Self {
        let identifier = ProviderIdentifier::new(model.clone(), profiles.values().copied());
        Self {
            identifier,
            model,
            profiles,
            generic: &GENERIC,
            threshold,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// 已注册的专用供应商名称
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.profiles.keys().copied().collect()
    }

    /// 根据识别结果选择配置
    pub fn select_profile(&self, identification: &ProviderIdentification) -> &'static ExtractionProfile {
        if identification.confidence <= self.threshold {
            return self.generic;
        }
        self.lookup(&identification.provider).unwrap_or(self.generic)
    }

    /// 精确匹配，或识别标签中包含注册名称 (如 "fjordkraft as")
    fn lookup(&self, provider: &str) -> Option<&'static ExtractionProfile> {
        let provider = provider.trim().to_lowercase();
        if let Some(profile) = self.profiles.get(provider.as_str()) {
            return Some(*profile);
        }
        self.profiles
            .iter()
            .find(|(name, _)| provider.contains(*name))
            .map(|(_, profile)| *profile)
    }

    pub async fn route(&self, image: &[u8]) -> Result<RoutedExtraction, ExtractionError> {
        let identification = self.identifier.identify(image).await;
        let profile = self.select_profile(&identification);
        tracing::info!(
            "选择提取配置: {} (识别: {}, 置信度 {:.2})",
            profile.provider,
            identification.provider,
            identification.confidence
        );

        let record = profile.extract(self.model.as_ref(), image).await.map_err(|e| {
            tracing::error!("提取失败 (配置 {}): {}", profile.provider, e);
            e
        })?;

        Ok(RoutedExtraction {
            identification,
            profile: profile.provider,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceError, VisionRequest};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Unused;

    #[async_trait]
    impl VisionModel for Unused {
        async fn complete(&self, _request: VisionRequest<'_>) -> Result<String, InferenceError> {
            Err(InferenceError::EmptyResponse)
        }
    }

    fn router() -> ExtractionRouter {
        ExtractionRouter::new(Arc::new(Unused))
    }

    fn id(provider: &str, confidence: f64) -> ProviderIdentification {
        ProviderIdentification {
            provider: provider.to_string(),
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn exposes_registered_providers() {
        assert_eq!(router().provider_names(), vec!["fjordkraft", "tibber", "motkraft"]);
    }

    #[test]
    fn confident_known_provider_gets_specialized_profile() {
        assert_eq!(router().select_profile(&id("tibber", 0.92)).provider, "tibber");
        assert_eq!(router().select_profile(&id("Fjordkraft AS", 0.8)).provider, "fjordkraft");
    }

    #[test]
    fn low_confidence_always_uses_generic() {
        for provider in ["fjordkraft", "tibber", "motkraft", "unknown"] {
            for confidence in [0.0, 0.5, 0.7] {
                assert_eq!(
                    router().select_profile(&id(provider, confidence)).provider,
                    "generic"
                );
            }
        }
    }

    #[test]
    fn unregistered_provider_uses_generic() {
        assert_eq!(router().select_profile(&id("agva kraft", 0.99)).provider, "generic");
    }

    #[test]
    fn threshold_is_configurable() {
        let router = router().with_threshold(0.9);
        assert_eq!(router.select_profile(&id("tibber", 0.85)).provider, "generic");
    }
}
