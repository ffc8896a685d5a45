//! 供应商修复规则
//!
//! 触发条件基于记录中已有的特征费用 (而不是识别结果)，
//! 并且要求记录不同时带有其他供应商的特征，保证同一条记录最多触发一个供应商的修复。

use super::canonical::{self, AmountBucket, CANONICAL_FEES_VERSION};
use super::consistency;
use super::{CorrectionRule, RuleKind};
use crate::models::{BillRecord, ExtraFee, AMOUNT_EPSILON};
use crate::profiles::tibber::TIBBER_MONTHLY_FEE;
use crate::profiles::{ExtractionProfile, FJORDKRAFT, MOTKRAFT, SPECIALIZED, TIBBER};

pub const FJORDKRAFT_CANONICAL: &str = "fjordkraft_canonical_fees";
pub const TIBBER_MONTHLY_FEE_RULE: &str = "tibber_missing_monthly_fee";
pub const MOTKRAFT_CANONICAL: &str = "motkraft_canonical_fees";

/// 只匹配该供应商的特征，不匹配其他任何供应商
pub fn exclusive_signature(profile: &ExtractionProfile, record: &BillRecord) -> bool {
    profile.matches_signature(record)
        && SPECIALIZED
            .iter()
            .filter(|other| other.provider != profile.provider)
            .all(|other| !other.matches_signature(record))
}

fn same_fees(fees: &[ExtraFee], bucket: &AmountBucket) -> bool {
    fees.len() == bucket.fees.len()
        && fees
            .iter()
            .zip(bucket.fees.iter())
            .all(|(fee, (label, amount))| {
                fee.label == *label && (fee.amount - amount).abs() <= AMOUNT_EPSILON
            })
}

/// 命中已知金额区间时整体替换费用列表，否则按配置允许列表重新过滤
fn canonical_repair(
    name: &'static str,
    description: &'static str,
    profile: &'static ExtractionProfile,
) -> CorrectionRule {
    CorrectionRule::new(
        name,
        description,
        RuleKind::ProviderRepair,
        move |record| {
            if !exclusive_signature(profile, record) {
                return false;
            }
            match canonical::lookup(profile.provider, record.total_amount) {
                Some(bucket) => !same_fees(&record.extra_fees, bucket),
                None => record.extra_fees.iter().any(|f| !profile.allows(&f.label)),
            }
        },
        move |mut record| {
            match canonical::lookup(profile.provider, record.total_amount) {
                Some(bucket) => {
                    record.extra_fees = bucket.fee_list();
                    record.recompute_extra_fees_total();
                    record.push_warning(format!(
                        "fee list replaced with canonical {} (fee table {})",
                        bucket.invoice_ref, CANONICAL_FEES_VERSION
                    ));
                }
                None => {
                    profile.conform(&mut record);
                }
            }
            consistency::flag_after_repair(&mut record);
            record
        },
    )
}

pub fn rules() -> Vec<CorrectionRule> {
    vec![
        canonical_repair(
            FJORDKRAFT_CANONICAL,
            "replace Fjordkraft fees with the canonical list for known invoice totals",
            &FJORDKRAFT,
        ),
        CorrectionRule::new(
            TIBBER_MONTHLY_FEE_RULE,
            "inject the Tibber monthly fee when it was missed",
            RuleKind::ProviderRepair,
            |record| {
                exclusive_signature(&TIBBER, record) && !TIBBER.has_fee_for(record, "Monthly fee")
            },
            |mut record| {
                record
                    .extra_fees
                    .push(ExtraFee::new("Monthly fee", TIBBER_MONTHLY_FEE, 0.8));
                record.recompute_extra_fees_total();
                record.push_warning(format!(
                    "injected missing Tibber monthly fee {:.2}",
                    TIBBER_MONTHLY_FEE
                ));
                consistency::flag_after_repair(&mut record);
                record
            },
        ),
        canonical_repair(
            MOTKRAFT_CANONICAL,
            "replace Motkraft fees with the canonical list for known invoice totals",
            &MOTKRAFT,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::sample_record;
    use crate::rules::CorrectionEngine;
    use pretty_assertions::assert_eq;

    fn repair_names(fired: &[String]) -> Vec<&str> {
        let repair: Vec<&'static str> = rules().iter().map(|r| r.name).collect();
        fired
            .iter()
            .map(|s| s.as_str())
            .filter(|s| repair.contains(s))
            .collect()
    }

    #[test]
    fn injects_tibber_monthly_fee() {
        let record = sample_record(&[("Pulse rental", 39.0)], 1688.2);
        let outcome = CorrectionEngine::new(rules()).apply(record);

        assert_eq!(outcome.fired_rules, vec![TIBBER_MONTHLY_FEE_RULE.to_string()]);
        assert_eq!(outcome.record.extra_fees_total, 88.0);
    }

    #[test]
    fn tibber_fee_under_alias_is_not_duplicated() {
        let record = sample_record(&[("Pulse rental", 39.0), ("Tibber medlemskap", 49.0)], 1688.2);
        let outcome = CorrectionEngine::new(rules()).apply(record);

        assert!(outcome.fired_rules.is_empty());
    }

    #[test]
    fn unknown_fjordkraft_total_falls_back_to_refilter() {
        let record = sample_record(
            &[("Variable cost", 150.0), ("Fixed markup", 49.0), ("Insurance", 59.0)],
            2890.0,
        );
        let outcome = CorrectionEngine::new(rules()).apply(record);

        assert_eq!(outcome.fired_rules, vec![FJORDKRAFT_CANONICAL.to_string()]);
        assert_eq!(outcome.record.extra_fees_total, 199.0);
        assert!(outcome.record.warnings[0].contains("Insurance"));
    }

    #[test]
    fn single_signature_fee_is_not_enough_for_fjordkraft() {
        let record = sample_record(&[("Fixed markup", 49.0), ("Insurance", 59.0)], 3817.0);
        let outcome = CorrectionEngine::new(rules()).apply(record);

        assert!(outcome.fired_rules.is_empty());
    }

    #[test]
    fn motkraft_known_total_uses_canonical_list() {
        let record = sample_record(&[("Climate contribution", 11.0)], 1897.4);
        let outcome = CorrectionEngine::new(rules()).apply(record);

        assert_eq!(outcome.fired_rules, vec![MOTKRAFT_CANONICAL.to_string()]);
        assert_eq!(outcome.record.extra_fees_total, 50.6);
    }

    #[test]
    fn repair_that_opens_a_gap_is_flagged_in_the_same_pass() {
        let engine = CorrectionEngine::standard();
        let mut record = sample_record(&[("Variable cost", 500.0), ("Fixed markup", 98.5)], 3817.0);
        record.grid_cost = 1120.0;
        record.energy_cost = 2098.5;

        let first = engine.apply(record);
        assert_eq!(first.fired_rules, vec![FJORDKRAFT_CANONICAL.to_string()]);
        assert!(first.record.has_warning(consistency::TOTAL_GAP_WARNING));

        let second = engine.apply(first.record.clone());
        assert!(second.fired_rules.is_empty(), "{:?}", second.fired_rules);
        assert_eq!(second.record, first.record);
    }

    #[test]
    fn tibber_injection_that_opens_a_gap_is_flagged() {
        let engine = CorrectionEngine::standard();
        let mut record = sample_record(&[("Pulse rental", 39.0)], 1000.0);
        record.grid_cost = 400.0;
        record.energy_cost = 571.0;

        let first = engine.apply(record);
        assert_eq!(first.fired_rules, vec![TIBBER_MONTHLY_FEE_RULE.to_string()]);
        assert!(first.record.has_warning(consistency::TOTAL_GAP_WARNING));
        assert!(engine.apply(first.record).fired_rules.is_empty());
    }

    #[test]
    fn conflicting_signatures_fire_no_repair() {
        let engine = CorrectionEngine::standard();
        let mixed = [
            sample_record(
                &[("Variable cost", 200.0), ("Fixed markup", 98.5), ("Pulse rental", 39.0)],
                3817.0,
            ),
            sample_record(&[("Pulse rental", 39.0), ("Climate contribution", 11.6)], 1897.4),
            sample_record(
                &[("Annual fee", 39.9), ("Fixed markup", 49.0), ("Klimabidrag", 16.34)],
                2660.0,
            ),
        ];

        for record in mixed {
            let outcome = engine.apply(record);
            assert!(repair_names(&outcome.fired_rules).is_empty(), "{:?}", outcome.fired_rules);
        }
    }

    #[test]
    fn at_most_one_repair_fires_per_record() {
        let engine = CorrectionEngine::standard();
        let records = [
            sample_record(&[("Variable cost", 200.0), ("Fixed markup", 98.5)], 3817.0),
            sample_record(&[("Pulse rental", 39.0)], 1500.0),
            sample_record(&[("Climate contribution", 11.6)], 2660.0),
        ];

        for record in records {
            let outcome = engine.apply(record);
            assert_eq!(repair_names(&outcome.fired_rules).len(), 1);
        }
    }
}
