use axum::{routing::{get, post}, Router};
use bill_extract_rust::{api, AnalysisService, AppConfig, BillAnalyzer, FeedbackStore, OpenAiVisionClient, SavingsCalculator};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 推理客户端与分析流水线 (规则与配置启动时构建一次，只读共享)
    let model = Arc::new(OpenAiVisionClient::new(&config.inference)?);
    let router = bill_extract_rust::service::ExtractionRouter::new(model)
        .with_threshold(config.pipeline.identify_threshold);
    let analyzer = Arc::new(BillAnalyzer::from_parts(
        router,
        bill_extract_rust::CorrectionEngine::standard(),
        bill_extract_rust::service::Validator::new(),
    ));
    info!(
        "Pipeline ready: providers {:?}, {} correction rules",
        analyzer.router().provider_names(),
        analyzer.engine().rules().len()
    );

    let savings = Arc::new(SavingsCalculator::new(config.pipeline.tax_multiplier));
    let feedback = Arc::new(AnalysisService::new(Arc::new(FeedbackStore::init())));

    // 构建路由
    let analyze_routes = Router::new()
        .route("/api/bills/analyze", post(api::analyze_bill))
        .route("/api/bills/analyze/batch", post(api::analyze_bills_batch))
        .with_state(analyzer);

    let savings_routes = Router::new()
        .route("/api/savings", post(api::quote_savings))
        .with_state(savings);

    let feedback_routes = Router::new()
        .route("/api/feedback", post(api::submit_feedback))
        .route("/api/feedback/report", get(api::feedback_report))
        .with_state(feedback.clone());

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(analyze_routes)
        .merge(savings_routes)
        .merge(feedback_routes)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/bills/analyze        - single bill");
    info!("  POST /api/bills/analyze/batch  - concurrent batch");
    info!("  POST /api/savings              - savings quote");
    info!("  POST /api/feedback             - extraction feedback");
    info!("  GET  /api/feedback/report      - feedback accuracy report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("无法监听退出信号: {}", e);
            }
        })
        .await?;

    // 退出前导出反馈报告
    let export_path = std::path::Path::new(&config.feedback.export_path);
    if !feedback.store().is_empty() {
        feedback.export_csv(export_path)?;
    }

    Ok(())
}
