//! 确定性修正规则引擎
//!
//! 规则按固定顺序执行一遍 (不是求不动点)：
//! 剥离规则 → 一致性标记 → 供应商修复。
//! 每条规则的条件都基于前面所有规则执行后的记录。

pub mod canonical;
pub mod consistency;
pub mod repair;
pub mod strip;
pub mod terms;

use crate::models::BillRecord;

type Condition = Box<dyn Fn(&BillRecord) -> bool + Send + Sync>;
type Transform = Box<dyn Fn(BillRecord) -> BillRecord + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Strip,
    ConsistencyFlag,
    ProviderRepair,
}

/// 修正规则：纯函数 (条件, 变换)，无状态
pub struct CorrectionRule {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: RuleKind,
    condition: Condition,
    transform: Transform,
}

impl CorrectionRule {
    pub fn new<C, T>(
        name: &'static str,
        description: &'static str,
        kind: RuleKind,
        condition: C,
        transform: T,
    ) -> Self
    where
        C: Fn(&BillRecord) -> bool + Send + Sync + 'static,
        T: Fn(BillRecord) -> BillRecord + Send + Sync + 'static,
    {
        Self {
            name,
            description,
            kind,
            condition: Box::new(condition),
            transform: Box::new(transform),
        }
    }

    pub fn applies(&self, record: &BillRecord) -> bool {
        (self.condition)(record)
    }

    pub fn apply(&self, record: BillRecord) -> BillRecord {
        (self.transform)(record)
    }
}

impl std::fmt::Debug for CorrectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// 修正结果：修正后的记录 + 按顺序触发的规则名
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    pub record: BillRecord,
    pub fired_rules: Vec<String>,
}

/// 规则引擎，启动时构建一次，之后只读
#[derive(Debug)]
pub struct CorrectionEngine {
    rules: Vec<CorrectionRule>,
}

impl CorrectionEngine {
    pub fn new(rules: Vec<CorrectionRule>) -> Self {
        Self { rules }
    }

    /// 标准规则顺序
    pub fn standard() -> Self {
        let mut rules = strip::rules();
        rules.push(consistency::rule());
        rules.extend(repair::rules());
        Self::new(rules)
    }

    pub fn rules(&self) -> &[CorrectionRule] {
        &self.rules
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn apply(&self, mut record: BillRecord) -> CorrectionOutcome {
        let mut fired_rules = Vec::new();
        for rule in &self.rules {
            if rule.applies(&record) {
                record = rule.apply(record);
                tracing::info!(
                    "规则触发: {} ({:?}), extraFeesTotal {:.2}",
                    rule.name,
                    rule.kind,
                    record.extra_fees_total
                );
                fired_rules.push(rule.name.to_string());
            }
        }
        CorrectionOutcome {
            record,
            fired_rules,
        }
    }
}

impl Default for CorrectionEngine {
    fn default() -> Self {
        Self::standard()
    }
}
