use crate::models::{BillRecord, AMOUNT_EPSILON};
use crate::rules::terms;
use serde::{Deserialize, Serialize};

pub const MIN_TOTAL_AMOUNT: f64 = 100.0;
pub const MAX_TOTAL_AMOUNT: f64 = 10_000.0;
pub const MIN_CONSUMPTION_KWH: f64 = 10.0;
pub const MAX_CONSUMPTION_KWH: f64 = 5_000.0;
pub const COMPONENT_GAP_TOLERANCE: f64 = 100.0;

/// 校验结果 (仅为提示，不阻止记录返回)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

/// 记录校验器：纯函数，每项检查最多产生一条警告
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, record: &BillRecord) -> ValidationReport {
        let mut warnings = Vec::new();

        let leaked: Vec<&str> = record
            .extra_fees
            .iter()
            .filter(|f| terms::is_forbidden(&f.label))
            .map(|f| f.label.as_str())
            .collect();
        if !leaked.is_empty() {
            warnings.push(format!(
                "forbidden terms remain in extra fees: {}",
                leaked.join(", ")
            ));
        }

        let fees_sum: f64 = record.extra_fees.iter().map(|f| f.amount).sum();
        if (fees_sum - record.extra_fees_total).abs() > AMOUNT_EPSILON {
            warnings.push(format!(
                "extra fees sum {:.2} does not match extraFeesTotal {:.2}",
                fees_sum, record.extra_fees_total
            ));
        }

        if record.total_amount < MIN_TOTAL_AMOUNT || record.total_amount > MAX_TOTAL_AMOUNT {
            warnings.push(format!(
                "totalAmount {:.2} outside plausible range [{}, {}]",
                record.total_amount, MIN_TOTAL_AMOUNT, MAX_TOTAL_AMOUNT
            ));
        }

        let gap = record.component_gap();
        if gap > COMPONENT_GAP_TOLERANCE {
            warnings.push(format!(
                "gridCost + energyCost + extraFeesTotal differs from totalAmount by {:.2}",
                gap
            ));
        }

        if record.consumption_kwh < MIN_CONSUMPTION_KWH || record.consumption_kwh > MAX_CONSUMPTION_KWH {
            warnings.push(format!(
                "consumption {:.1} kWh outside plausible range [{}, {}]",
                record.consumption_kwh, MIN_CONSUMPTION_KWH, MAX_CONSUMPTION_KWH
            ));
        }

        ValidationReport {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }
}
