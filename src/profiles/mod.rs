//! 供应商提取配置
//!
//! 每个配置描述一个供应商账单上可能出现的附加费用 (封闭列表)、
//! 每项费用的出现规则、需要原样读取的推导值，以及示例。
//! 通用配置使用开放词汇表 + 严格排除表。

pub mod fjordkraft;
pub mod generic;
pub mod motkraft;
pub mod tibber;

use crate::inference::{extract_json, InferencePurpose, VisionModel, VisionRequest};
use crate::models::{round_cents, BillRecord, ExtraFee};
use crate::rules::terms::{self, TermCategory};
use indexmap::IndexMap;
use std::fmt::Write as _;
use thiserror::Error;

pub use fjordkraft::FJORDKRAFT;
pub use generic::GENERIC;
pub use motkraft::MOTKRAFT;
pub use tibber::TIBBER;

/// 通用配置的名称
pub const GENERIC_PROFILE: &str = "generic";

/// 提取失败 (推理调用失败或输出不符合 schema)
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("inference call failed for profile {profile}: {source}")]
    Inference {
        profile: &'static str,
        #[source]
        source: crate::inference::InferenceError,
    },

    #[error("response for profile {profile} does not match the bill schema: {reason}")]
    Schema { profile: &'static str, reason: String },
}

/// 费用出现规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// 每张账单都有
    Always,
    /// 账单上可见时提取
    IfVisible,
    /// 不得作为附加费用提取
    Forbidden,
}

impl Presence {
    fn instruction(&self) -> &'static str {
        match self {
            Presence::Always => "ALWAYS present - extract it every time",
            Presence::IfVisible => "extract ONLY if visible on the bill",
            Presence::Forbidden => "FORBIDDEN - never list as an extra fee",
        }
    }
}

#[derive(Debug)]
pub struct FeeRule {
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub presence: Presence,
    pub note: &'static str,
}

impl FeeRule {
    /// 标签是否指向该费用 (忽略大小写，包含匹配)
    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        std::iter::once(self.label)
            .chain(self.aliases.iter().copied())
            .any(|term| label.contains(&term.to_lowercase()))
    }
}

#[derive(Debug)]
pub struct WorkedExample {
    pub description: &'static str,
    pub fees: &'static [(&'static str, f64)],
    pub total_amount: f64,
}

/// 供应商特征费用：修复规则据此判断记录来自哪个供应商
#[derive(Debug)]
pub struct Signature {
    pub terms: &'static [&'static str],
    pub min_hits: usize,
}

impl Signature {
    pub fn hits(&self, record: &BillRecord) -> usize {
        record
            .extra_fees
            .iter()
            .filter(|fee| {
                let label = fee.label.to_lowercase();
                self.terms.iter().any(|t| label.contains(&t.to_lowercase()))
            })
            .count()
    }

    pub fn matches(&self, record: &BillRecord) -> bool {
        self.min_hits > 0 && self.hits(record) >= self.min_hits
    }
}

#[derive(Debug)]
pub struct ExtractionProfile {
    pub provider: &'static str,
    pub display_name: &'static str,
    /// 识别阶段使用的视觉/文字线索
    pub visual_cues: &'static [&'static str],
    pub fee_rules: &'static [FeeRule],
    pub derivations: &'static [&'static str],
    pub examples: &'static [WorkedExample],
    pub signature: Signature,
    /// 通用配置接受未列出的标签 (排除表之外)
    pub open_vocabulary: bool,
}

impl ExtractionProfile {
    pub fn fee_rule_for(&self, label: &str) -> Option<&FeeRule> {
        self.fee_rules.iter().find(|rule| rule.matches(label))
    }

    /// 标签是否符合该配置的允许列表
    pub fn allows(&self, label: &str) -> bool {
        if terms::is_forbidden(label) {
            return false;
        }
        match self.fee_rule_for(label) {
            Some(rule) => rule.presence != Presence::Forbidden,
            None => self.open_vocabulary,
        }
    }

    /// 记录中是否已有指定规则对应的费用
    pub fn has_fee_for(&self, record: &BillRecord, rule_label: &str) -> bool {
        let Some(rule) = self.fee_rules.iter().find(|r| r.label == rule_label) else {
            return false;
        };
        record.extra_fees.iter().any(|fee| rule.matches(&fee.label))
    }

    pub fn matches_signature(&self, record: &BillRecord) -> bool {
        self.signature.matches(record)
    }

    /// 构建推理调用的指令文本
    pub fn instructions(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "You are reading a photographed electricity bill issued by {}.",
            self.display_name
        );
        out.push_str(
            "Extract the cost breakdown. Extra fees are supplier-added charges the customer \
             could avoid by switching supplier. Grid cost, base energy cost, taxes and rounding \
             are NOT extra fees.\n\n",
        );

        out.push_str("FEE LABELS:\n");
        for rule in self.fee_rules {
            let _ = write!(out, "- \"{}\": {}", rule.label, rule.presence.instruction());
            if !rule.aliases.is_empty() {
                let _ = write!(out, " (also printed as: {})", rule.aliases.join(", "));
            }
            if !rule.note.is_empty() {
                let _ = write!(out, ". {}", rule.note);
            }
            out.push('\n');
        }
        if self.open_vocabulary {
            out.push_str("- Any other supplier-added charge may be listed under its printed label.\n");
        } else {
            out.push_str("- No other labels are allowed in extraFees.\n");
        }

        out.push_str("\nNEVER LIST AS EXTRA FEES:\n");
        for category in TermCategory::ALL {
            let _ = writeln!(out, "- {}", category.describe());
        }

        if !self.derivations.is_empty() {
            out.push_str("\nREAD VERBATIM:\n");
            for derivation in self.derivations {
                let _ = writeln!(out, "- {}", derivation);
            }
        }

        if !self.examples.is_empty() {
            out.push_str("\nEXAMPLES:\n");
            for example in self.examples {
                let fees: Vec<String> = example
                    .fees
                    .iter()
                    .map(|(label, amount)| format!("{} {:.2}", label, amount))
                    .collect();
                let sum: f64 = example.fees.iter().map(|(_, a)| a).sum();
                let _ = writeln!(
                    out,
                    "- {}: totalAmount {:.2}, extraFees [{}], extraFeesTotal {:.2}",
                    example.description,
                    example.total_amount,
                    fees.join("; "),
                    round_cents(sum)
                );
            }
        }

        out.push('\n');
        out.push_str(RESPONSE_SCHEMA);
        out
    }

    /// 只保留允许列表内的费用，被丢弃的费用记为警告
    pub fn conform(&self, record: &mut BillRecord) -> Vec<ExtraFee> {
        let removed = record.retain_fees(|fee| self.allows(&fee.label));
        for fee in &removed {
            record.push_warning(format!(
                "dropped fee '{}' ({:.2}) not allowed by profile {}",
                fee.label, fee.amount, self.provider
            ));
        }
        removed
    }

    /// 对账单图片执行提取：推理调用 → 解析 → 允许列表约束
    pub async fn extract(
        &self,
        model: &dyn VisionModel,
        image: &[u8],
    ) -> Result<BillRecord, ExtractionError> {
        let instructions = self.instructions();
        let raw = model
            .complete(VisionRequest {
                purpose: InferencePurpose::Extraction,
                image,
                instructions: &instructions,
            })
            .await
            .map_err(|source| ExtractionError::Inference {
                profile: self.provider,
                source,
            })?;

        let mut record = parse_candidate(&raw).map_err(|reason| ExtractionError::Schema {
            profile: self.provider,
            reason,
        })?;

        let removed = self.conform(&mut record);
        tracing::info!(
            "[{}] 提取完成: {} 项附加费用, 丢弃 {} 项, extraFeesTotal {:.2}",
            self.provider,
            record.extra_fees.len(),
            removed.len(),
            record.extra_fees_total
        );
        Ok(record)
    }
}

/// 推理服务必须返回的 JSON schema
pub const RESPONSE_SCHEMA: &str = r#"Respond with ONE JSON object and nothing else:
{
  "gridCost": number,
  "energyCost": number,
  "extraFeesTotal": number,
  "extraFees": [{"label": string, "amount": number, "confidence": number}],
  "consumptionKWh": number,
  "period": string,
  "contractType": "fixed" | "variable",
  "confidence": number,
  "warnings": [string],
  "totalAmount": number
}
Amounts are numbers in the bill currency (no currency symbols, dot as decimal separator).
Discounts are negative amounts. extraFeesTotal must equal the sum of extraFees amounts."#;

/// 将推理输出解析为候选记录；任何不符合 schema 的输出均为硬失败
pub fn parse_candidate(raw: &str) -> Result<BillRecord, String> {
    let json = extract_json(raw).ok_or_else(|| "no JSON object in response".to_string())?;
    let mut record: BillRecord = serde_json::from_str(json).map_err(|e| e.to_string())?;

    for (name, value) in [
        ("gridCost", record.grid_cost),
        ("energyCost", record.energy_cost),
        ("extraFeesTotal", record.extra_fees_total),
        ("totalAmount", record.total_amount),
        ("consumptionKWh", record.consumption_kwh),
    ] {
        if !value.is_finite() {
            return Err(format!("{} is not a finite number", name));
        }
    }
    for (name, value) in [
        ("gridCost", record.grid_cost),
        ("energyCost", record.energy_cost),
        ("totalAmount", record.total_amount),
    ] {
        if value < 0.0 {
            return Err(format!("{} must be non-negative, got {}", name, value));
        }
    }
    if let Some(fee) = record.extra_fees.iter().find(|f| !f.amount.is_finite()) {
        return Err(format!("fee '{}' has a non-finite amount", fee.label));
    }
    if let Some(fee) = record.extra_fees.iter().find(|f| f.label.trim().is_empty()) {
        return Err(format!("fee with amount {} has an empty label", fee.amount));
    }

    record.confidence = clamp_unit(record.confidence);
    for fee in record.extra_fees.iter_mut() {
        fee.confidence = clamp_unit(fee.confidence);
    }
    // 候选记录自带的 locale 信息一律忽略，由调用方透传
    record.locale_hints = None;
    Ok(record)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 专用配置 (不含通用配置)，按注册顺序
pub static SPECIALIZED: [&ExtractionProfile; 3] = [&FJORDKRAFT, &TIBBER, &MOTKRAFT];

pub fn specialized_profiles() -> IndexMap<&'static str, &'static ExtractionProfile> {
    SPECIALIZED
        .iter()
        .map(|profile| (profile.provider, *profile))
        .collect()
}
