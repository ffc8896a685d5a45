use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub pipeline: PipelineConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 推理服务配置 (OpenAI 兼容的 chat completions 接口)
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_key: String,
    /// 提取用模型
    pub model: String,
    /// 识别用轻量模型
    pub identify_model: String,
    pub max_tokens: u32,
    /// HTTP 客户端超时 (流水线本身不设超时)
    pub timeout_secs: u64,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("identify_model", &self.identify_model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 识别置信度高于此值才使用专用配置
    pub identify_threshold: f64,
    /// 附加费用为税前金额，报价时乘以该系数
    pub tax_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub export_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            inference: InferenceConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                model: "gpt-4o".to_string(),
                identify_model: "gpt-4o-mini".to_string(),
                max_tokens: 2048,
                timeout_secs: 300,
            },
            pipeline: PipelineConfig {
                identify_threshold: 0.7,
                tax_multiplier: 1.25,
            },
            feedback: FeedbackConfig {
                export_path: "feedback_report.csv".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 → billscan.toml (可选) → BILLSCAN__* 环境变量
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();
        config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("billscan").required(false))
            .add_source(
                config::Environment::with_prefix("BILLSCAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 从环境变量加载配置，失败时退回默认值
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("配置加载失败, 使用默认配置: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_contract() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.identify_threshold, 0.7);
        assert_eq!(config.pipeline.tax_multiplier, 1.25);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.inference.api_key = "sk-secret".to_string();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
    }
}
