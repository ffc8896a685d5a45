//! 剥离规则：移除被误识别为附加费用的税费、电网费、现货电价和舍入调整

use super::terms::TermCategory;
use super::{CorrectionRule, RuleKind};
use crate::models::AMOUNT_EPSILON;

pub const STRIP_TAX: &str = "strip_tax_and_levies";
pub const STRIP_GRID: &str = "strip_grid_charges";
pub const STRIP_SPOT: &str = "strip_spot_price";
pub const STRIP_ROUNDING: &str = "strip_rounding_adjustments";
pub const RECONCILE_TOTAL: &str = "reconcile_extra_fees_total";

fn strip_rule(name: &'static str, description: &'static str, category: TermCategory) -> CorrectionRule {
    CorrectionRule::new(
        name,
        description,
        RuleKind::Strip,
        move |record| record.extra_fees.iter().any(|f| category.matches(&f.label)),
        move |mut record| {
            let removed = record.retain_fees(|f| !category.matches(&f.label));
            for fee in &removed {
                tracing::debug!("{}: 移除 '{}' ({:.2})", name, fee.label, fee.amount);
            }
            record
        },
    )
}

pub fn rules() -> Vec<CorrectionRule> {
    vec![
        strip_rule(
            STRIP_TAX,
            "remove VAT, consumption tax and public levies from extra fees",
            TermCategory::Tax,
        ),
        strip_rule(
            STRIP_GRID,
            "remove grid subscription and network usage charges from extra fees",
            TermCategory::GridCharge,
        ),
        strip_rule(
            STRIP_SPOT,
            "remove the base spot energy price from extra fees",
            TermCategory::SpotPrice,
        ),
        strip_rule(
            STRIP_ROUNDING,
            "remove rounding adjustments from extra fees",
            TermCategory::Rounding,
        ),
        CorrectionRule::new(
            RECONCILE_TOTAL,
            "set extraFeesTotal to the sum of the listed fees",
            RuleKind::Strip,
            |record| (record.fees_sum() - record.extra_fees_total).abs() > AMOUNT_EPSILON,
            |mut record| {
                record.recompute_extra_fees_total();
                record
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::sample_record;
    use crate::rules::CorrectionEngine;
    use pretty_assertions::assert_eq;

    #[test]
    fn each_strip_fires_only_for_its_category() {
        let engine = CorrectionEngine::new(rules());
        let record = sample_record(&[("Nettleie", 320.0), ("Monthly fee", 39.0)], 800.0);
        let outcome = engine.apply(record);

        assert_eq!(outcome.fired_rules, vec![STRIP_GRID.to_string()]);
        assert_eq!(outcome.record.extra_fees_total, 39.0);
    }

    #[test]
    fn reconcile_fixes_drifted_total() {
        let engine = CorrectionEngine::new(rules());
        let mut record = sample_record(&[("Monthly fee", 39.0), ("Markup", 12.5)], 800.0);
        record.extra_fees_total = 60.0;
        let outcome = engine.apply(record);

        assert_eq!(outcome.fired_rules, vec![RECONCILE_TOTAL.to_string()]);
        assert_eq!(outcome.record.extra_fees_total, 51.5);
    }

    #[test]
    fn all_forbidden_labels_removed() {
        let engine = CorrectionEngine::new(rules());
        let record = sample_record(
            &[
                ("MVA 25%", 95.0),
                ("Grid subscription", 210.0),
                ("Spot price", 600.0),
                ("Rounding", -0.21),
                ("Service fee", 29.0),
            ],
            1100.0,
        );
        let outcome = engine.apply(record);

        assert_eq!(outcome.fired_rules.len(), 4);
        assert_eq!(outcome.record.extra_fees.len(), 1);
        assert_eq!(outcome.record.extra_fees_total, 29.0);
    }
}
