pub mod analyzer;
pub mod feedback;
pub mod identifier;
pub mod router;
pub mod savings;
pub mod validator;

pub use analyzer::BillAnalyzer;
pub use feedback::{AnalysisService, FeedbackStore};
pub use identifier::ProviderIdentifier;
pub use router::ExtractionRouter;
pub use savings::SavingsCalculator;
pub use validator::{ValidationReport, Validator};
