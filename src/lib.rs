pub mod api;
pub mod config;
pub mod inference;
pub mod models;
pub mod profiles;
pub mod rules;
pub mod service;

pub use config::AppConfig;
pub use inference::{OpenAiVisionClient, VisionModel};
pub use rules::CorrectionEngine;
pub use service::{AnalysisService, BillAnalyzer, FeedbackStore, SavingsCalculator};
