use serde::{Deserialize, Serialize};

/// 未识别的供应商标签
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// 供应商识别结果 (仅用于选择提取配置，不持久化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderIdentification {
    pub provider: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl ProviderIdentification {
    /// 识别失败时的安全默认值
    pub fn unknown(reasoning: impl Into<String>) -> Self {
        Self {
            provider: UNKNOWN_PROVIDER.to_string(),
            confidence: 0.0,
            reasoning: reasoning.into(),
        }
    }

    /// 规范化: 供应商小写去空格，置信度限制在 0..1
    pub fn normalized(mut self) -> Self {
        self.provider = self.provider.trim().to_lowercase();
        if self.provider.is_empty() {
            self.provider = UNKNOWN_PROVIDER.to_string();
        }
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}
