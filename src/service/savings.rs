use crate::models::{round_cents, BillRecord};
use serde::{Deserialize, Serialize};

/// 附加费用为税前金额，报价按含税总额计算
pub const DEFAULT_TAX_MULTIPLIER: f64 = 1.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsQuote {
    /// 可通过切换供应商避免的费用 (税前)
    pub switchable_fees: f64,
    /// 电网费，永远不可切换
    pub grid_cost_excluded: f64,
    /// 替代方案的费用 (税前)
    pub alternative_fees: f64,
    /// 含税的每期节省金额，永不为负
    pub monthly_saving: f64,
    pub annual_saving: f64,
}

/// 节省计算器
#[derive(Debug, Clone, Copy)]
pub struct SavingsCalculator {
    tax_multiplier: f64,
}

impl SavingsCalculator {
    pub fn new(tax_multiplier: f64) -> Self {
        Self { tax_multiplier }
    }

    pub fn tax_multiplier(&self) -> f64 {
        self.tax_multiplier
    }

    pub fn quote(&self, record: &BillRecord, alternative_monthly_fee: Option<f64>) -> SavingsQuote {
        let switchable_fees = round_cents(record.extra_fees.iter().map(|f| f.amount).sum());
        let alternative_fees = alternative_monthly_fee
            .filter(|fee| fee.is_finite())
            .unwrap_or(0.0)
            .max(0.0);

        let gross = (switchable_fees - alternative_fees) * self.tax_multiplier;
        let monthly_saving = round_cents(gross.max(0.0));

        SavingsQuote {
            switchable_fees,
            grid_cost_excluded: record.grid_cost,
            alternative_fees,
            monthly_saving,
            annual_saving: round_cents(monthly_saving * 12.0),
        }
    }
}

impl Default for SavingsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::sample_record;
    use pretty_assertions::assert_eq;

    #[test]
    fn grosses_up_fees_and_ignores_grid() {
        let mut record = sample_record(&[("Monthly fee", 49.0), ("Markup", 31.0)], 1500.0);
        record.grid_cost = 600.0;
        let quote = SavingsCalculator::default().quote(&record, None);

        assert_eq!(quote.switchable_fees, 80.0);
        assert_eq!(quote.monthly_saving, 100.0);
        assert_eq!(quote.annual_saving, 1200.0);
        assert_eq!(quote.grid_cost_excluded, 600.0);
    }

    #[test]
    fn alternative_fee_reduces_saving() {
        let record = sample_record(&[("Monthly fee", 49.0)], 1500.0);
        let quote = SavingsCalculator::default().quote(&record, Some(29.0));

        assert_eq!(quote.monthly_saving, 25.0);
    }

    #[test]
    fn negative_saving_never_surfaces() {
        let discounted = sample_record(&[("Monthly fee", 39.0), ("Discount", -60.0)], 1500.0);
        assert_eq!(SavingsCalculator::default().quote(&discounted, None).monthly_saving, 0.0);

        let cheap = sample_record(&[("Monthly fee", 19.0)], 1500.0);
        assert_eq!(SavingsCalculator::default().quote(&cheap, Some(49.0)).monthly_saving, 0.0);
    }
}
