use super::router::ExtractionRouter;
use super::validator::Validator;
use crate::inference::VisionModel;
use crate::models::{AnalysisOutcome, LocaleHints};
use crate::profiles::ExtractionError;
use crate::rules::CorrectionEngine;
use std::sync::Arc;
use std::time::Instant;

/// 账单分析流水线：路由提取 → 规则修正 → 校验
///
/// 无共享可变状态，可并发处理任意多个请求。
pub struct BillAnalyzer {
    router: ExtractionRouter,
    engine: CorrectionEngine,
    validator: Validator,
}

impl BillAnalyzer {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self::from_parts(ExtractionRouter::new(model), CorrectionEngine::standard(), Validator::new())
    }

    pub fn from_parts(router: ExtractionRouter, engine: CorrectionEngine, validator: Validator) -> Self {
        Self {
            router,
            engine,
            validator,
        }
    }

    pub fn router(&self) -> &ExtractionRouter {
        &self.router
    }

    pub fn engine(&self) -> &CorrectionEngine {
        &self.engine
    }

    pub async fn analyze(
        &self,
        image: &[u8],
        locale_hints: Option<LocaleHints>,
    ) -> Result<AnalysisOutcome, ExtractionError> {
        let start = Instant::now();
        tracing::info!("开始分析账单图片, {} 字节", image.len());

        let routed = self.router.route(image).await?;

        let correction = self.engine.apply(routed.record);
        let mut record = correction.record;

        let report = self.validator.validate(&record);
        for warning in &report.warnings {
            record.push_warning(warning.clone());
        }
        record.locale_hints = locale_hints;

        tracing::info!(
            "账单分析完成: 配置 {}, 触发规则 {:?}, 校验警告 {}, extraFeesTotal {:.2}, 耗时: {:?}",
            routed.profile,
            correction.fired_rules,
            report.warnings.len(),
            record.extra_fees_total,
            start.elapsed()
        );

        Ok(AnalysisOutcome {
            record,
            fired_rules: correction.fired_rules,
            warnings: report.warnings,
            is_valid: report.is_valid,
            provider: routed.identification,
            profile: routed.profile.to_string(),
        })
    }
}
