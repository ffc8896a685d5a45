use super::{CorrectionRule, RuleKind};
use crate::models::BillRecord;

pub const FLAG_TOTAL_GAP: &str = "flag_total_gap";

/// totalAmount 与 grid + energy + extraFeesTotal 的差距阈值
pub const CONSISTENCY_GAP_THRESHOLD: f64 = 50.0;

pub const TOTAL_GAP_WARNING: &str =
    "totalAmount differs from gridCost + energyCost + extraFeesTotal; a fee was likely missed or misattributed";

/// 只标记，不修改金额
pub fn rule() -> CorrectionRule {
    CorrectionRule::new(
        FLAG_TOTAL_GAP,
        "warn when the bill components do not add up to the amount due",
        RuleKind::ConsistencyFlag,
        |record| {
            record.component_gap() > CONSISTENCY_GAP_THRESHOLD && !record.has_warning(TOTAL_GAP_WARNING)
        },
        |mut record| {
            tracing::warn!(
                "账单金额不一致: totalAmount {:.2}, 差距 {:.2}",
                record.total_amount,
                record.component_gap()
            );
            record.push_warning(TOTAL_GAP_WARNING);
            record
        },
    )
}

/// 修复规则改动费用之后补做的检查，差距超过阈值时追加同一条警告
pub fn flag_after_repair(record: &mut BillRecord) {
    if record.component_gap() > CONSISTENCY_GAP_THRESHOLD && !record.has_warning(TOTAL_GAP_WARNING) {
        tracing::warn!(
            "修复后账单金额不一致: totalAmount {:.2}, 差距 {:.2}",
            record.total_amount,
            record.component_gap()
        );
        record.push_warning(TOTAL_GAP_WARNING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::sample_record;

    #[test]
    fn flags_without_touching_amounts() {
        let mut record = sample_record(&[("Monthly fee", 50.0)], 1000.0);
        record.grid_cost = 500.0;
        record.energy_cost = 300.0;
        let rule = rule();

        assert!(rule.applies(&record));
        let flagged = rule.apply(record.clone());
        assert_eq!(flagged.extra_fees, record.extra_fees);
        assert_eq!(flagged.extra_fees_total, record.extra_fees_total);
        assert_eq!(flagged.warnings, vec![TOTAL_GAP_WARNING.to_string()]);
        assert!(!rule.applies(&flagged));
    }

    #[test]
    fn post_repair_check_only_warns_once() {
        let mut record = sample_record(&[("Monthly fee", 50.0)], 1000.0);
        flag_after_repair(&mut record);
        flag_after_repair(&mut record);
        assert_eq!(record.warnings, vec![TOTAL_GAP_WARNING.to_string()]);
        assert!(!rule().applies(&record));

        let mut balanced = sample_record(&[("Monthly fee", 50.0)], 60.0);
        flag_after_repair(&mut balanced);
        assert!(balanced.warnings.is_empty());
    }

    #[test]
    fn small_gap_is_tolerated() {
        let mut record = sample_record(&[("Monthly fee", 50.0)], 880.0);
        record.grid_cost = 500.0;
        record.energy_cost = 300.0;

        assert!(!rule().applies(&record));
    }
}
