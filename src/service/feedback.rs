//! 提取反馈存储与分析服务
//!
//! 生命周期: 启动时初始化 → 收到反馈时追加 → 生成报告时读取。
//! 存储通过 Arc 显式传入服务，不使用全局状态。

use crate::models::{round_cents, AMOUNT_EPSILON};
use crate::profiles::{ExtractionProfile, GENERIC, SPECIALIZED};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("invalid feedback: {0}")]
    InvalidSubmission(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 用户提交的修正反馈
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub profile: String,
    pub extracted_extra_fees_total: f64,
    pub actual_extra_fees_total: f64,
    #[serde(default)]
    pub fired_rules: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackExample {
    pub profile: String,
    pub prompt_version: String,
    pub extracted_extra_fees_total: f64,
    pub actual_extra_fees_total: f64,
    pub fired_rules: Vec<String>,
    pub comment: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl FeedbackExample {
    pub fn abs_error(&self) -> f64 {
        (self.extracted_extra_fees_total - self.actual_extra_fees_total).abs()
    }
}

/// 配置指令的版本 (指令文本的哈希)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVersion {
    pub profile: String,
    pub version: String,
    pub registered_at: DateTime<Utc>,
}

impl PromptVersion {
    pub fn of(profile: &ExtractionProfile) -> Self {
        let mut hasher = DefaultHasher::new();
        profile.instructions().hash(&mut hasher);
        Self {
            profile: profile.provider.to_string(),
            version: format!("{:016x}", hasher.finish()),
            registered_at: Utc::now(),
        }
    }
}

/// 反馈存储：按配置分组的示例 + 当前指令版本
#[derive(Debug, Default)]
pub struct FeedbackStore {
    examples: DashMap<String, Vec<FeedbackExample>>,
    /// 每个配置的指令版本历史 (只追加)
    prompt_versions: DashMap<String, Vec<PromptVersion>>,
}

impl FeedbackStore {
    /// 初始化并登记所有配置的指令版本
    pub fn init() -> Self {
        let store = Self::default();
        for profile in SPECIALIZED.iter().copied().chain(std::iter::once(&GENERIC)) {
            store.register_prompt(PromptVersion::of(profile));
        }
        store
    }

    /// 追加指令版本；与最新版本相同时不重复记录
    pub fn register_prompt(&self, version: PromptVersion) {
        let mut history = self.prompt_versions.entry(version.profile.clone()).or_default();
        if history.last().map(|v| v.version != version.version).unwrap_or(true) {
            tracing::info!("登记指令版本: {} {}", version.profile, version.version);
            history.push(version);
        }
    }

    /// 最新的指令版本
    pub fn prompt_version(&self, profile: &str) -> Option<String> {
        self.prompt_versions
            .get(profile)
            .and_then(|history| history.last().map(|v| v.version.clone()))
    }

    pub fn prompt_history(&self, profile: &str) -> Vec<PromptVersion> {
        self.prompt_versions
            .get(profile)
            .map(|history| history.value().clone())
            .unwrap_or_default()
    }

    pub fn append(&self, example: FeedbackExample) {
        self.examples
            .entry(example.profile.clone())
            .or_default()
            .push(example);
    }

    pub fn len(&self) -> usize {
        self.examples.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按配置名排序的快照
    pub fn snapshot(&self) -> Vec<(String, Vec<FeedbackExample>)> {
        let mut out: Vec<(String, Vec<FeedbackExample>)> = self
            .examples
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// 单个配置的准确率统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAccuracy {
    pub profile: String,
    pub prompt_version: Option<String>,
    pub samples: usize,
    pub mean_abs_error: f64,
    pub max_abs_error: f64,
    pub exact_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub total_samples: usize,
    pub profiles: Vec<ProfileAccuracy>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAck {
    pub profile: String,
    pub prompt_version: String,
    pub total_samples: usize,
}

/// 反馈分析服务
pub struct AnalysisService {
    store: Arc<FeedbackStore>,
}

impl AnalysisService {
    pub fn new(store: Arc<FeedbackStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<FeedbackStore> {
        &self.store
    }

    pub fn record_feedback(&self, submission: FeedbackSubmission) -> Result<FeedbackAck, FeedbackError> {
        let profile = submission.profile.trim().to_lowercase();
        let prompt_version = self.store.prompt_version(&profile).ok_or_else(|| {
            FeedbackError::InvalidSubmission(format!("unknown profile '{}'", submission.profile))
        })?;
        for (name, value) in [
            ("extractedExtraFeesTotal", submission.extracted_extra_fees_total),
            ("actualExtraFeesTotal", submission.actual_extra_fees_total),
        ] {
            if !value.is_finite() {
                return Err(FeedbackError::InvalidSubmission(format!("{} is not finite", name)));
            }
        }

        self.store.append(FeedbackExample {
            profile: profile.clone(),
            prompt_version: prompt_version.clone(),
            extracted_extra_fees_total: submission.extracted_extra_fees_total,
            actual_extra_fees_total: submission.actual_extra_fees_total,
            fired_rules: submission.fired_rules,
            comment: submission.comment,
            received_at: Utc::now(),
        });

        let total_samples = self.store.len();
        tracing::info!("收到反馈: 配置 {}, 累计 {} 条", profile, total_samples);
        Ok(FeedbackAck {
            profile,
            prompt_version,
            total_samples,
        })
    }

    pub fn report(&self) -> FeedbackReport {
        let profiles: Vec<ProfileAccuracy> = self
            .store
            .snapshot()
            .into_iter()
            .map(|(profile, examples)| {
                let samples = examples.len();
                let errors: Vec<f64> = examples.iter().map(|e| e.abs_error()).collect();
                let sum: f64 = errors.iter().sum();
                let max = errors.iter().cloned().fold(0.0, f64::max);
                let exact = errors.iter().filter(|e| **e <= AMOUNT_EPSILON).count();
                ProfileAccuracy {
                    prompt_version: self.store.prompt_version(&profile),
                    profile,
                    samples,
                    mean_abs_error: round_cents(sum / samples.max(1) as f64),
                    max_abs_error: round_cents(max),
                    exact_rate: exact as f64 / samples.max(1) as f64,
                }
            })
            .collect();

        FeedbackReport {
            total_samples: profiles.iter().map(|p| p.samples).sum(),
            profiles,
            generated_at: Utc::now(),
        }
    }

    /// 导出报告到 CSV 文件
    pub fn export_csv(&self, output_path: &Path) -> Result<usize, FeedbackError> {
        let report = self.report();
        let file = std::fs::File::create(output_path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record([
            "profile",
            "prompt_version",
            "samples",
            "mean_abs_error",
            "max_abs_error",
            "exact_rate",
        ])?;
        for row in &report.profiles {
            writer.write_record(&[
                row.profile.clone(),
                row.prompt_version.clone().unwrap_or_default(),
                row.samples.to_string(),
                format!("{:.2}", row.mean_abs_error),
                format!("{:.2}", row.max_abs_error),
                format!("{:.3}", row.exact_rate),
            ])?;
        }

        writer.flush()?;
        tracing::info!("反馈报告已导出: {:?}, {} 行", output_path, report.profiles.len());
        Ok(report.profiles.len())
    }
}
