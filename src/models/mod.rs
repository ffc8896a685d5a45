pub mod bill;
pub mod provider;
pub mod result;

pub use bill::{round_cents, BillRecord, ContractType, ExtraFee, LocaleHints, AMOUNT_EPSILON};
pub use provider::{ProviderIdentification, UNKNOWN_PROVIDER};
pub use result::AnalysisOutcome;
