use crate::models::{AnalysisOutcome, BillRecord, LocaleHints};
use crate::service::feedback::{FeedbackAck, FeedbackReport, FeedbackSubmission};
use crate::service::savings::SavingsQuote;
use crate::service::{AnalysisService, BillAnalyzer, SavingsCalculator};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 对外展示的提取失败信息 (具体原因只记日志)
pub const ANALYZE_FAILED_MESSAGE: &str = "could not analyze the bill";

/// 请求体: 账单图片 (base64) + 可选的地区信息
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_base64: String,
    #[serde(default)]
    pub locale_hints: Option<LocaleHints>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<AnalysisOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub bills: Vec<AnalyzeRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<AnalyzeResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRequest {
    pub record: BillRecord,
    #[serde(default)]
    pub alternative_monthly_fee: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub ack: Option<FeedbackAck>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, String> {
    // 兼容 data URL
    let payload = match encoded.split_once(";base64,") {
        Some((_, data)) => data,
        None => encoded,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("invalid base64 image: {}", e))?;
    if bytes.is_empty() {
        return Err("image is empty".to_string());
    }
    Ok(bytes)
}

async fn analyze_one(analyzer: &BillAnalyzer, req: AnalyzeRequest) -> (StatusCode, AnalyzeResponse) {
    let image = match decode_image(&req.image_base64) {
        Ok(image) => image,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                AnalyzeResponse {
                    success: false,
                    message,
                    result: None,
                },
            )
        }
    };

    match analyzer.analyze(&image, req.locale_hints).await {
        Ok(outcome) => (
            StatusCode::OK,
            AnalyzeResponse {
                success: true,
                message: format!(
                    "Analyzed bill with profile {}, {} rules fired",
                    outcome.profile,
                    outcome.fired_rules.len()
                ),
                result: Some(outcome),
            },
        ),
        Err(e) => {
            tracing::error!("账单分析失败: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                AnalyzeResponse {
                    success: false,
                    message: ANALYZE_FAILED_MESSAGE.to_string(),
                    result: None,
                },
            )
        }
    }
}

/// 单张账单分析
pub async fn analyze_bill(
    State(analyzer): State<Arc<BillAnalyzer>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let (status, response) = analyze_one(&analyzer, req).await;
    (status, Json(response)).into_response()
}

/// 批量分析，每张账单独立并发执行
pub async fn analyze_bills_batch(
    State(analyzer): State<Arc<BillAnalyzer>>,
    Json(req): Json<BatchAnalyzeRequest>,
) -> Response {
    let total = req.bills.len();
    let tasks = req.bills.into_iter().map(|bill| analyze_one(&analyzer, bill));
    let results: Vec<AnalyzeResponse> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|(_, response)| response)
        .collect();

    let succeeded = results.iter().filter(|r| r.success).count();
    let response = BatchAnalyzeResponse {
        success: succeeded == total,
        message: format!("Analyzed {}/{} bills", succeeded, total),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 节省报价
pub async fn quote_savings(
    State(calculator): State<Arc<SavingsCalculator>>,
    Json(req): Json<SavingsRequest>,
) -> Json<SavingsQuote> {
    Json(calculator.quote(&req.record, req.alternative_monthly_fee))
}

/// 提交提取反馈
pub async fn submit_feedback(
    State(service): State<Arc<AnalysisService>>,
    Json(req): Json<FeedbackSubmission>,
) -> Response {
    match service.record_feedback(req) {
        Ok(ack) => {
            let response = FeedbackResponse {
                success: true,
                message: format!("Feedback recorded, {} samples total", ack.total_samples),
                ack: Some(ack),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = FeedbackResponse {
                success: false,
                message: format!("Error: {}", e),
                ack: None,
            };
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
    }
}

/// 反馈准确率报告
pub async fn feedback_report(State(service): State<Arc<AnalysisService>>) -> Json<FeedbackReport> {
    Json(service.report())
}
