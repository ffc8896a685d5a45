use super::{BillRecord, ProviderIdentification};
use serde::{Deserialize, Serialize};

/// 单次账单分析的完整输出：修正后的记录、触发的规则、校验警告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub record: BillRecord,
    pub fired_rules: Vec<String>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
    pub provider: ProviderIdentification,
    pub profile: String,
}
