use serde::{Deserialize, Serialize};

/// 金额比较容差 (分)
pub const AMOUNT_EPSILON: f64 = 0.01;

/// 四舍五入到分
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 合同类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    #[serde(alias = "Fixed", alias = "FIXED")]
    Fixed,
    #[serde(alias = "Variable", alias = "VARIABLE", alias = "spot", alias = "Spot")]
    Variable,
}

/// 可切换的附加费用明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFee {
    pub label: String,
    pub amount: f64, // 折扣可为负
    #[serde(default = "default_fee_confidence")]
    pub confidence: f64,
}

fn default_fee_confidence() -> f64 {
    1.0
}

impl ExtraFee {
    pub fn new(label: impl Into<String>, amount: f64, confidence: f64) -> Self {
        Self {
            label: label.into(),
            amount,
            confidence,
        }
    }
}

/// 调用方透传的地区信息 (邮编/电价区)，流水线本身不读取
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_area: Option<String>,
}

/// 账单提取记录 - 流水线的工作单元与输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub grid_cost: f64,
    pub energy_cost: f64,
    pub extra_fees_total: f64,
    pub extra_fees: Vec<ExtraFee>,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: f64,
    #[serde(default)]
    pub period: String,
    pub contract_type: ContractType,
    pub confidence: f64,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_hints: Option<LocaleHints>,
}

impl BillRecord {
    /// 附加费用明细之和
    pub fn fees_sum(&self) -> f64 {
        round_cents(self.extra_fees.iter().map(|f| f.amount).sum())
    }

    /// 按明细重新计算 extraFeesTotal
    pub fn recompute_extra_fees_total(&mut self) {
        self.extra_fees_total = self.fees_sum();
    }

    /// 保留满足条件的费用，返回被移除的费用；总额随之重算
    pub fn retain_fees<F>(&mut self, mut keep: F) -> Vec<ExtraFee>
    where
        F: FnMut(&ExtraFee) -> bool,
    {
        let (kept, removed): (Vec<ExtraFee>, Vec<ExtraFee>) =
            self.extra_fees.drain(..).partition(|f| keep(f));
        self.extra_fees = kept;
        self.recompute_extra_fees_total();
        removed
    }

    /// totalAmount 与各组成部分之和的差距
    pub fn component_gap(&self) -> f64 {
        (self.total_amount - (self.grid_cost + self.energy_cost + self.extra_fees_total)).abs()
    }

    pub fn has_warning(&self, warning: &str) -> bool {
        self.warnings.iter().any(|w| w == warning)
    }

    /// 追加警告 (去重)
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.has_warning(&warning) {
            self.warnings.push(warning);
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(fees: &[(&str, f64)], total_amount: f64) -> BillRecord {
    let extra_fees: Vec<ExtraFee> = fees
        .iter()
        .map(|(label, amount)| ExtraFee::new(*label, *amount, 0.9))
        .collect();
    let extra_fees_total = round_cents(extra_fees.iter().map(|f| f.amount).sum());
    BillRecord {
        grid_cost: 0.0,
        energy_cost: 0.0,
        extra_fees_total,
        extra_fees,
        consumption_kwh: 1200.0,
        period: "01.01.2024 - 31.01.2024".to_string(),
        contract_type: ContractType::Variable,
        confidence: 0.9,
        warnings: Vec::new(),
        total_amount,
        locale_hints: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn retain_fees_recomputes_total() {
        let mut record = sample_record(&[("VAT", 50.0), ("Service fee", 20.0)], 70.0);
        let removed = record.retain_fees(|f| f.label != "VAT");

        assert_eq!(removed.len(), 1);
        assert_eq!(record.extra_fees_total, 20.0);
        assert_eq!(record.extra_fees.len(), 1);
    }

    #[test]
    fn parses_schema_field_names() {
        let json = r#"{
            "gridCost": 512.3, "energyCost": 801.0, "extraFeesTotal": 49.0,
            "extraFees": [{"label": "Monthly fee", "amount": 49.0, "confidence": 0.95}],
            "consumptionKWh": 1180, "period": "1.2-29.2", "contractType": "Variable",
            "confidence": 0.8, "warnings": [], "totalAmount": 1362.3
        }"#;
        let record: BillRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.contract_type, ContractType::Variable);
        assert_eq!(record.consumption_kwh, 1180.0);
        assert!(record.locale_hints.is_none());
    }

    #[test]
    fn push_warning_deduplicates() {
        let mut record = sample_record(&[], 100.0);
        record.push_warning("gap");
        record.push_warning("gap");
        assert_eq!(record.warnings, vec!["gap".to_string()]);
    }
}
